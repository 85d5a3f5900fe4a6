//! Hedge ratio estimation.
//!
//! Two interchangeable strategies behind one trait: a static OLS slope
//! over the full history, and a recursive Kalman estimate producing one
//! ratio per timestamp. Both are deterministic pure functions of their
//! inputs; neither holds state across calls.

use serde::{Deserialize, Serialize};

use crate::config::KalmanConfig;
use crate::error::PairLabError;
use crate::math::kalman::filter_ratio_series;
use crate::math::ols::fit_linear;

/// Units of instrument B offsetting one unit of instrument A.
#[derive(Debug, Clone, PartialEq)]
pub enum HedgeRatio {
    /// One slope applied uniformly across all timestamps.
    Static(f64),
    /// One ratio per timestamp, aligned 1:1 with the pair's history.
    Dynamic(Vec<f64>),
}

impl HedgeRatio {
    /// The ratio in effect at timestamp index `t`.
    pub fn value_at(&self, t: usize) -> f64 {
        match self {
            HedgeRatio::Static(ratio) => *ratio,
            HedgeRatio::Dynamic(path) => path[t],
        }
    }

    /// Length of the dynamic path, if any.
    pub fn len(&self) -> Option<usize> {
        match self {
            HedgeRatio::Static(_) => None,
            HedgeRatio::Dynamic(path) => Some(path.len()),
        }
    }
}

/// Which estimator a caller wants; useful for CLI plumbing and configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    Static,
    Kalman,
}

/// Strategy seam for hedge ratio estimation.
pub trait HedgeRatioEstimator {
    /// Estimate the hedge ratio of `series_a` against `series_b`.
    ///
    /// Inputs are the overlapping non-missing history of the pair, equal
    /// length, in timestamp order.
    fn estimate(&self, series_a: &[f64], series_b: &[f64]) -> Result<HedgeRatio, PairLabError>;
}

/// Static estimator: the OLS slope of `a = intercept + ratio * b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsHedgeEstimator;

impl HedgeRatioEstimator for OlsHedgeEstimator {
    fn estimate(&self, series_a: &[f64], series_b: &[f64]) -> Result<HedgeRatio, PairLabError> {
        let fit = fit_linear(series_a, series_b)?;
        Ok(HedgeRatio::Static(fit.slope))
    }
}

/// Recursive estimator: scalar Kalman filter over the observed price
/// ratio, one posterior mean per timestamp.
#[derive(Debug, Clone)]
pub struct KalmanHedgeEstimator {
    config: KalmanConfig,
}

impl KalmanHedgeEstimator {
    pub fn new(config: KalmanConfig) -> Result<Self, PairLabError> {
        config.validate().map_err(PairLabError::InvalidConfig)?;
        Ok(Self { config })
    }
}

impl HedgeRatioEstimator for KalmanHedgeEstimator {
    fn estimate(&self, series_a: &[f64], series_b: &[f64]) -> Result<HedgeRatio, PairLabError> {
        if series_a.len() != series_b.len() {
            return Err(PairLabError::InvalidConfig(format!(
                "leg length mismatch: {} vs {}",
                series_a.len(),
                series_b.len()
            )));
        }
        if series_a.is_empty() {
            return Err(PairLabError::InsufficientData {
                expected: 1,
                actual: 0,
            });
        }
        Ok(HedgeRatio::Dynamic(filter_ratio_series(
            series_a,
            series_b,
            &self.config,
        )))
    }
}
