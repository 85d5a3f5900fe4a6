//! CLI argument parsing using clap.
//!
//! This module defines the command-line interface for pairlab,
//! including all subcommands and their arguments. Tunable parameters are
//! optional on the command line: an explicit flag wins, then a value from
//! the `--config` JSON file, then the built-in default.

use clap::{Parser, Subcommand};

/// pairlab - Statistical Arbitrage Research Toolkit
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub verbose: String,

    /// Optional JSON configuration file providing defaults
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a price table for cointegrated pairs
    Scan {
        /// Path to the date-indexed close-price CSV
        #[arg(long)]
        data: String,
        /// p-value threshold for accepting a pair [default: 0.05]
        #[arg(long)]
        p_threshold: Option<f64>,
        /// Minimum overlapping observations per pair [default: 60]
        #[arg(long)]
        min_observations: Option<usize>,
        /// Number of top pairs to display
        #[arg(long, default_value_t = 15)]
        top: usize,
        /// Output file for the ranked pairs JSON
        #[arg(long, default_value = "cointegrated_pairs.json")]
        output: String,
    },

    /// Backtest the spread strategy over one or more pairs
    Backtest {
        /// Path to the date-indexed close-price CSV
        #[arg(long)]
        data: String,
        /// Pairs file produced by `scan` (JSON with two-field pairs)
        #[arg(long, conflicts_with = "pair")]
        pairs: Option<String>,
        /// Single pair as "SYMBOL_A,SYMBOL_B"
        #[arg(long)]
        pair: Option<String>,
        /// Hedge ratio estimator: "static" (OLS) or "kalman"
        #[arg(long, default_value = "static")]
        estimator: String,
        /// Rolling window for the z-score [default: 60]
        #[arg(long)]
        window: Option<usize>,
        /// Entry z-score threshold [default: 2.0]
        #[arg(long)]
        entry: Option<f64>,
        /// Exit z-score threshold [default: 0.5]
        #[arg(long)]
        exit: Option<f64>,
        /// Proportional commission per position change [default: 0.001]
        #[arg(long)]
        commission: Option<f64>,
        /// Number of top-ranked pairs to backtest from the pairs file
        #[arg(long, default_value_t = 10)]
        num_pairs: usize,
        /// Output file for the summary JSON
        #[arg(long, default_value = "backtest_results.json")]
        output: String,
    },

    /// Grid-search window and entry-threshold parameters for one pair
    Optimize {
        /// Path to the date-indexed close-price CSV
        #[arg(long)]
        data: String,
        /// Pair as "SYMBOL_A,SYMBOL_B"
        #[arg(long)]
        pair: String,
        /// Comma-separated window candidates [default: 20,30,...,100]
        #[arg(long)]
        windows: Option<String>,
        /// Comma-separated entry-threshold candidates
        /// [default: 1.0,1.5,2.0,2.5,3.0]
        #[arg(long)]
        thresholds: Option<String>,
        /// Fixed exit threshold across the grid [default: 0.5]
        #[arg(long)]
        exit: Option<f64>,
        /// Proportional commission per position change [default: 0.001]
        #[arg(long)]
        commission: Option<f64>,
        /// Output file for the grid JSON
        #[arg(long, default_value = "optimization_grid.json")]
        output: String,
    },
}
