//! Ordinary least squares.
//!
//! Two entry points: [`fit_linear`] for the single-regressor-with-intercept
//! fits used by hedge-ratio estimation and Engle-Granger step one, and
//! [`fit_ols`] for the small multi-regressor systems of the augmented
//! Dickey-Fuller lag regression.

use nalgebra::{DMatrix, DVector};

use crate::error::PairLabError;

/// Result of a single-regressor fit `y = intercept + slope * x`.
#[derive(Debug, Clone)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// `y[i] - (intercept + slope * x[i])`, same length as the inputs.
    pub residuals: Vec<f64>,
}

/// Fit `y = intercept + slope * x` by least squares.
///
/// Errors on mismatched lengths, fewer than 3 observations, or a
/// zero-variance regressor (singular fit).
pub fn fit_linear(y: &[f64], x: &[f64]) -> Result<LinearFit, PairLabError> {
    if y.len() != x.len() {
        return Err(PairLabError::InvalidConfig(format!(
            "regression length mismatch: {} vs {}",
            y.len(),
            x.len()
        )));
    }
    if y.len() < 3 {
        return Err(PairLabError::InsufficientData {
            expected: 3,
            actual: y.len(),
        });
    }

    let n = y.len() as f64;
    let mean_x: f64 = x.iter().sum::<f64>() / n;
    let mean_y: f64 = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        covariance += dx * (yi - mean_y);
        variance_x += dx * dx;
    }

    if variance_x.abs() < f64::EPSILON || !variance_x.is_finite() {
        return Err(PairLabError::Degenerate(
            "zero-variance regressor".to_string(),
        ));
    }

    let slope = covariance / variance_x;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(PairLabError::Degenerate(
            "non-finite regression coefficients".to_string(),
        ));
    }

    let residuals = y
        .iter()
        .zip(x.iter())
        .map(|(yi, xi)| yi - (intercept + slope * xi))
        .collect();

    Ok(LinearFit {
        intercept,
        slope,
        residuals,
    })
}

/// Result of a multi-regressor least-squares fit (no implicit intercept).
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    /// Standard error per coefficient, from sigma^2 * (X'X)^-1.
    pub standard_errors: Vec<f64>,
    pub sse: f64,
    pub nobs: usize,
}

/// Solve `y = X b` by the normal equations.
///
/// `design` is n x p with the regressors as columns; callers supply their
/// own constant column if one is wanted. Errors when the system is
/// under-determined or X'X is singular.
pub fn fit_ols(design: &DMatrix<f64>, target: &DVector<f64>) -> Result<OlsFit, PairLabError> {
    let n = design.nrows();
    let p = design.ncols();
    if n != target.len() {
        return Err(PairLabError::InvalidConfig(format!(
            "design has {} rows, target has {}",
            n,
            target.len()
        )));
    }
    if n <= p {
        return Err(PairLabError::InsufficientData {
            expected: p + 1,
            actual: n,
        });
    }

    let xtx = design.transpose() * design;
    let xtx_inv = xtx
        .try_inverse()
        .ok_or_else(|| PairLabError::Degenerate("singular design matrix".to_string()))?;
    let beta = &xtx_inv * design.transpose() * target;

    let fitted = design * &beta;
    let residuals = target - fitted;
    let sse: f64 = residuals.iter().map(|r| r * r).sum();

    // Unbiased error variance with p estimated parameters.
    let sigma2 = sse / (n - p) as f64;
    let standard_errors: Vec<f64> = (0..p)
        .map(|i| (sigma2 * xtx_inv[(i, i)]).sqrt())
        .collect();

    if standard_errors.iter().any(|se| !se.is_finite()) {
        return Err(PairLabError::Degenerate(
            "non-finite coefficient standard error".to_string(),
        ));
    }

    Ok(OlsFit {
        coefficients: beta.iter().copied().collect(),
        standard_errors,
        sse,
        nobs: n,
    })
}
