//! MacKinnon approximate p-values for Dickey-Fuller tau statistics.
//!
//! Implements the MacKinnon (1994) regression-surface approximation for
//! the constant-only case: the p-value is the standard normal CDF of a
//! low-order polynomial in the test statistic, with separate polynomials
//! for the small-p and large-p regions. `n_series = 1` is the plain ADF
//! test; `n_series = 2` is the Engle-Granger residual test for one
//! cointegrating pair.
//!
//! # References
//!
//! - MacKinnon, J.G. (1994). "Approximate Asymptotic Distribution
//!   Functions for Unit-Root and Cointegration Tests"

use statrs::function::erf::erfc;

const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Statistics above this are firmly in the "no evidence" tail: p = 1.
const TAU_MAX: [f64; 2] = [2.74, 0.92];
/// Statistics below this are beyond the fitted surface: p = 0.
const TAU_MIN: [f64; 2] = [-18.83, -18.86];
/// Boundary between the small-p and large-p polynomial fits.
const TAU_STAR: [f64; 2] = [-1.61, -2.62];

/// Small-p region: quadratic in tau.
const TAU_SMALL_P: [[f64; 3]; 2] = [
    [2.1659, 1.4412, 0.038269],
    [2.92, 1.5012, 0.039796],
];

/// Large-p region: cubic in tau.
const TAU_LARGE_P: [[f64; 4]; 2] = [
    [1.7339, 0.93202, -0.12745, -0.010368],
    [2.1945, 0.64695, -0.29198, -0.042377],
];

fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Approximate p-value for a constant-only Dickey-Fuller tau statistic.
///
/// `n_series` is the number of series in the cointegrating relationship
/// (1 for a univariate unit-root test, 2 for a pairwise Engle-Granger
/// residual test). Values outside the supported range are clamped.
pub fn mackinnon_p_value(tau: f64, n_series: usize) -> f64 {
    let idx = n_series.clamp(1, TAU_MAX.len()) - 1;

    if tau > TAU_MAX[idx] {
        return 1.0;
    }
    if tau < TAU_MIN[idx] {
        return 0.0;
    }

    let poly = if tau <= TAU_STAR[idx] {
        let c = &TAU_SMALL_P[idx];
        c[0] + c[1] * tau + c[2] * tau * tau
    } else {
        let c = &TAU_LARGE_P[idx];
        c[0] + c[1] * tau + c[2] * tau * tau + c[3] * tau * tau * tau
    };

    standard_normal_cdf(poly)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adf_five_percent_critical_value() {
        // The classic univariate 5% critical value is about -2.86.
        let p = mackinnon_p_value(-2.86, 1);
        assert!((p - 0.05).abs() < 0.005, "expected ~0.05, got {}", p);
    }

    #[test]
    fn test_engle_granger_five_percent_critical_value() {
        // For a pair, the 5% critical value sits near -3.34.
        let p = mackinnon_p_value(-3.34, 2);
        assert!((p - 0.05).abs() < 0.005, "expected ~0.05, got {}", p);
    }

    #[test]
    fn test_monotone_in_tau() {
        let taus = [-6.0, -4.0, -3.0, -2.0, -1.0, 0.0];
        let ps: Vec<f64> = taus.iter().map(|&t| mackinnon_p_value(t, 2)).collect();
        for pair in ps.windows(2) {
            assert!(pair[0] <= pair[1], "p-values must not decrease: {:?}", ps);
        }
    }

    #[test]
    fn test_tail_clamps() {
        assert_eq!(mackinnon_p_value(5.0, 2), 1.0);
        assert_eq!(mackinnon_p_value(-25.0, 2), 0.0);
    }

    #[test]
    fn test_small_and_large_regions_agree_at_boundary() {
        let boundary = TAU_STAR[1];
        let below = mackinnon_p_value(boundary - 1e-9, 2);
        let above = mackinnon_p_value(boundary + 1e-9, 2);
        assert!((below - above).abs() < 0.01);
    }
}
