//! Error types for the pairlab library.

use thiserror::Error;

/// Errors that can occur while loading data or running the analytics pipeline.
#[derive(Error, Debug)]
pub enum PairLabError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV / DataFrame error from polars
    #[error("CSV error: {0}")]
    Csv(#[from] polars::error::PolarsError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Date parsing error
    #[error("Date parsing error: {0}")]
    DateParse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Insufficient historical data for analysis
    #[error("Insufficient data: expected at least {expected} observations, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Instrument not present in the price table
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Numerically degenerate input (constant series, singular regression)
    #[error("Degenerate series: {0}")]
    Degenerate(String),
}
