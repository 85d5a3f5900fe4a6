//! Engle-Granger two-step cointegration test.
//!
//! Step one regresses one price series on the other with an intercept;
//! step two runs an augmented Dickey-Fuller test on the regression
//! residuals. Because the residuals are mean-zero by construction, the
//! ADF regression carries no deterministic term; the p-value comes from
//! the MacKinnon surface for two cointegrated series.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::error::PairLabError;
use crate::math::mackinnon::mackinnon_p_value;
use crate::math::ols::{fit_linear, fit_ols};

/// Outcome of one pairwise test.
#[derive(Debug, Clone, Copy)]
pub struct EngleGrangerOutcome {
    /// ADF t-statistic of the residual series. More negative means
    /// stronger evidence of cointegration.
    pub test_statistic: f64,
    /// Approximate probability that the residual is non-stationary.
    pub p_value: f64,
}

/// Minimum observations for the residual unit-root test.
pub const MIN_TEST_OBSERVATIONS: usize = 20;

/// Run the Engle-Granger test with `series_a` as the dependent leg.
///
/// `max_lag` bounds the ADF lag order; `None` applies the Schwert rule.
/// Degenerate inputs (constant legs, singular regressions) surface as
/// errors for the caller to convert into skips.
pub fn engle_granger_test(
    series_a: &[f64],
    series_b: &[f64],
    max_lag: Option<usize>,
) -> Result<EngleGrangerOutcome, PairLabError> {
    if series_a.len() < MIN_TEST_OBSERVATIONS {
        return Err(PairLabError::InsufficientData {
            expected: MIN_TEST_OBSERVATIONS,
            actual: series_a.len(),
        });
    }

    let cointegrating_fit = fit_linear(series_a, series_b)?;
    let test_statistic = adf_t_statistic(&cointegrating_fit.residuals, max_lag)?;
    let p_value = mackinnon_p_value(test_statistic, 2);

    trace!(
        tau = test_statistic,
        p = p_value,
        slope = cointegrating_fit.slope,
        "Engle-Granger test complete"
    );

    Ok(EngleGrangerOutcome {
        test_statistic,
        p_value,
    })
}

/// Augmented Dickey-Fuller t-statistic with no deterministic terms:
///
/// ```text
/// Δe[t] = γ·e[t-1] + Σ φ_i·Δe[t-i] + ε
/// ```
///
/// The lag order is chosen by AIC over `0..=max_lag`, every candidate
/// fitted on the common sample implied by the largest lag, then the
/// winning order is refitted on its full usable sample.
fn adf_t_statistic(series: &[f64], max_lag: Option<usize>) -> Result<f64, PairLabError> {
    let n = series.len();
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let mut bound = max_lag.unwrap_or(schwert);
    // Keep enough rows to estimate the largest candidate model.
    while bound > 0 && diffs.len().saturating_sub(bound) < bound + 10 {
        bound -= 1;
    }

    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=bound {
        let fit = fit_adf_regression(series, &diffs, lag, bound)?;
        let nobs = fit.nobs as f64;
        let aic = nobs * (fit.sse / nobs).max(f64::MIN_POSITIVE).ln() + 2.0 * (lag + 1) as f64;
        match best {
            Some((best_aic, _)) if aic >= best_aic => {}
            _ => best = Some((aic, lag)),
        }
    }

    let (_, chosen_lag) = best.ok_or_else(|| {
        PairLabError::Degenerate("no admissible ADF lag order".to_string())
    })?;

    // Refit at the chosen order on its full usable sample.
    let fit = fit_adf_regression(series, &diffs, chosen_lag, chosen_lag)?;
    let gamma = fit.coefficients[0];
    let se = fit.standard_errors[0];
    if se.abs() < f64::EPSILON {
        return Err(PairLabError::Degenerate(
            "zero standard error in ADF regression".to_string(),
        ));
    }

    let t = gamma / se;
    if !t.is_finite() {
        return Err(PairLabError::Degenerate(
            "non-finite ADF statistic".to_string(),
        ));
    }
    Ok(t)
}

/// Fit the ADF regression at one lag order. Rows start at `start_lag` in
/// the difference series so candidates with different orders can share a
/// sample; column 0 is the lagged level whose t-statistic is the test.
fn fit_adf_regression(
    series: &[f64],
    diffs: &[f64],
    lag: usize,
    start_lag: usize,
) -> Result<crate::math::ols::OlsFit, PairLabError> {
    let rows = diffs.len() - start_lag;
    if rows < lag + 2 {
        return Err(PairLabError::InsufficientData {
            expected: lag + 2,
            actual: rows,
        });
    }

    let design = DMatrix::from_fn(rows, lag + 1, |r, c| {
        let t = start_lag + r;
        if c == 0 {
            // Lagged level: diffs[t] = e[t+1] - e[t], regressed on e[t].
            series[t]
        } else {
            diffs[t - c]
        }
    });
    let target = DVector::from_fn(rows, |r, _| diffs[start_lag + r]);

    fit_ols(&design, &target)
}
