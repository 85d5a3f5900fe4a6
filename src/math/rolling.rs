//! Rolling-window statistics.
//!
//! Outputs are `Option<f64>` per timestamp: `None` for the first
//! `window - 1` positions where the window is not yet full. Warm-up is an
//! explicit, testable contract, not NaN propagation.

/// Rolling mean over a fixed window.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_stat(values, window, |slice, mean| {
        let _ = slice;
        mean
    })
}

/// Rolling sample standard deviation (n - 1 denominator) over a fixed
/// window. A full window of identical values yields `Some(0.0)`; callers
/// that treat zero dispersion as undefined make that decision themselves.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_stat(values, window, |slice, mean| {
        let sum_sq: f64 = slice.iter().map(|v| (v - mean) * (v - mean)).sum();
        (sum_sq / (slice.len() - 1) as f64).sqrt()
    })
}

fn rolling_stat<F>(values: &[f64], window: usize, finish: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64], f64) -> f64,
{
    let mut out = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }

    for end in window..=values.len() {
        let slice = &values[end - window..end];
        let mean = slice.iter().sum::<f64>() / window as f64;
        out[end - 1] = Some(finish(slice, mean));
    }
    out
}
