//! Mathematical utilities for the research pipeline.
//!
//! This module provides the statistical primitives the analytics
//! components are built from: least squares, rolling window statistics,
//! Kalman filtering for dynamic hedge ratio estimation, and the MacKinnon
//! p-value approximation for unit-root tests.

pub mod kalman;
pub mod mackinnon;
pub mod ols;
pub mod rolling;

pub use kalman::KalmanRatioFilter;
