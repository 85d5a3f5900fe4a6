//! Kalman filter for dynamic hedge ratio estimation.
//!
//! Implements a 1D Kalman filter that tracks the hedge ratio between two
//! assets as a latent state observed through the raw price ratio. This
//! lets a strategy adapt to a drifting cointegration relationship instead
//! of freezing a single regression slope.
//!
//! # Mathematical Model
//!
//! **State equation** (random walk):
//! ```text
//! r[t] = r[t-1] + w,  where w ~ N(0, Q)
//! ```
//!
//! **Observation equation**:
//! ```text
//! z[t] = r[t] + v,  where v ~ N(0, R)
//! ```
//!
//! Where:
//! - `z[t]` is the observed price ratio `a[t] / b[t]`
//! - `r[t]` is the hedge ratio being estimated
//! - `Q` is process noise (how fast the ratio drifts)
//! - `R` is observation noise (measurement uncertainty)
//!
//! The filter is strictly causal: the posterior at `t` depends only on
//! observations up to and including `t`. No smoothing pass exists, so the
//! estimate at any timestamp is identical regardless of what follows it.

use crate::config::KalmanConfig;

/// Scalar Kalman filter over the observed price ratio.
///
/// O(1) per update; holds no history.
#[derive(Debug, Clone)]
pub struct KalmanRatioFilter {
    /// Posterior mean of the hedge ratio.
    mean: f64,
    /// Posterior variance (P).
    variance: f64,
    /// Process noise covariance (Q). Higher Q adapts faster, noisier.
    process_noise: f64,
    /// Observation noise covariance (R). Higher R smooths harder.
    observation_noise: f64,
}

impl KalmanRatioFilter {
    pub fn new(config: &KalmanConfig) -> Self {
        Self {
            mean: config.initial_mean,
            variance: config.initial_variance,
            process_noise: config.process_noise,
            observation_noise: config.observation_noise,
        }
    }

    /// Advance the filter by one observed ratio and return the posterior
    /// mean.
    ///
    /// Non-finite observations leave the state untouched and return the
    /// current mean, so one bad tick cannot poison the estimate.
    pub fn update(&mut self, observed_ratio: f64) -> f64 {
        if !observed_ratio.is_finite() {
            return self.mean;
        }

        // Predict: random-walk state, covariance inflates by Q.
        let predicted_variance = self.variance + self.process_noise;

        // Update: H = 1, so the innovation is the raw residual.
        let innovation = observed_ratio - self.mean;
        let innovation_variance = predicted_variance + self.observation_noise;
        if innovation_variance.abs() < f64::EPSILON {
            return self.mean;
        }

        let gain = predicted_variance / innovation_variance;
        self.mean += gain * innovation;
        // Variance floor guards against f64 round-off going negative.
        self.variance = ((1.0 - gain) * predicted_variance).max(1e-12);

        self.mean
    }

    /// Current posterior mean.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Current posterior variance. Lower means higher confidence.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }
}

/// Run the filter over two aligned price series, producing one posterior
/// mean per timestamp.
///
/// Observations where the denominator is too small to form a meaningful
/// ratio are skipped (state carried forward), mirroring the non-finite
/// guard in [`KalmanRatioFilter::update`].
pub fn filter_ratio_series(series_a: &[f64], series_b: &[f64], config: &KalmanConfig) -> Vec<f64> {
    const MIN_DENOMINATOR: f64 = 1e-12;

    let mut filter = KalmanRatioFilter::new(config);
    series_a
        .iter()
        .zip(series_b.iter())
        .map(|(a, b)| {
            if b.abs() < MIN_DENOMINATOR {
                filter.mean()
            } else {
                filter.update(a / b)
            }
        })
        .collect()
}
