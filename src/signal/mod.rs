//! Spread, z-score and position signal generation.
//!
//! The spread of a pair is standardized against its own rolling history
//! and fed through a hysteresis state machine: positions open beyond the
//! entry threshold and close once the spread has reverted inside the exit
//! threshold. The machine is stepped once per timestamp, so every
//! transition is individually auditable and unit-testable.

use serde::{Deserialize, Serialize};

use crate::config::SignalConfig;
use crate::error::PairLabError;
use crate::hedge::HedgeRatio;
use crate::math::rolling::{rolling_mean, rolling_std};

/// Strategy stance at one timestamp.
///
/// `Long` is long the spread (long A, short ratio-scaled B); `Short` is
/// the inverse; `Flat` carries no exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Long,
    Short,
    Flat,
}

impl Position {
    /// Signed exposure used by the return accounting.
    pub fn direction(self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
            Position::Flat => 0.0,
        }
    }
}

/// Full output of signal generation for one pair.
#[derive(Debug, Clone)]
pub struct SignalSeries {
    /// `a[t] - hedge(t) * b[t]`, defined at every timestamp.
    pub spread: Vec<f64>,
    /// Standardized spread; `None` during warm-up or zero dispersion.
    pub z_score: Vec<Option<f64>>,
    /// Position per timestamp; `None` only before the first defined
    /// z-score, forward-carried afterwards.
    pub positions: Vec<Option<Position>>,
}

/// Compute the spread of a pair under a static or per-timestamp ratio.
pub fn compute_spread(series_a: &[f64], series_b: &[f64], hedge: &HedgeRatio) -> Vec<f64> {
    series_a
        .iter()
        .zip(series_b.iter())
        .enumerate()
        .map(|(t, (a, b))| a - hedge.value_at(t) * b)
        .collect()
}

/// One step of the hysteresis machine.
///
/// Entry conditions take precedence, so an extreme z-score flips an open
/// position directly without passing through `Flat`.
fn next_position(previous: Position, z: f64, entry: f64, exit: f64) -> Position {
    if z < -entry {
        Position::Long
    } else if z > entry {
        Position::Short
    } else {
        match previous {
            Position::Long if z >= -exit => Position::Flat,
            Position::Short if z <= exit => Position::Flat,
            held => held,
        }
    }
}

/// Generate spread, z-score and positions for one pair.
///
/// `series_a`/`series_b` are the pair's overlapping history; a dynamic
/// hedge ratio must be aligned to the same axis.
pub fn generate(
    series_a: &[f64],
    series_b: &[f64],
    hedge: &HedgeRatio,
    config: &SignalConfig,
) -> Result<SignalSeries, PairLabError> {
    config.validate().map_err(PairLabError::InvalidConfig)?;

    if series_a.len() != series_b.len() {
        return Err(PairLabError::InvalidConfig(format!(
            "leg length mismatch: {} vs {}",
            series_a.len(),
            series_b.len()
        )));
    }
    if let Some(hedge_len) = hedge.len() {
        if hedge_len != series_a.len() {
            return Err(PairLabError::InvalidConfig(format!(
                "hedge ratio path has {} values for {} timestamps",
                hedge_len,
                series_a.len()
            )));
        }
    }

    let spread = compute_spread(series_a, series_b, hedge);
    let means = rolling_mean(&spread, config.window);
    let stds = rolling_std(&spread, config.window);

    let z_score: Vec<Option<f64>> = spread
        .iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(value, (mean, std))| match (mean, std) {
            // Zero dispersion leaves the z-score undefined rather than
            // materializing an infinite or arbitrary value.
            (Some(mean), Some(std)) if *std > 0.0 => Some((value - mean) / std),
            _ => None,
        })
        .collect();

    let mut positions = Vec::with_capacity(z_score.len());
    let mut state: Option<Position> = None;
    for z in &z_score {
        state = match (state, z) {
            // Warm-up: no position until the first defined z-score.
            (None, None) => None,
            // The state carried into the first defined step is Flat.
            (None, Some(z)) => Some(next_position(
                Position::Flat,
                *z,
                config.entry_threshold,
                config.exit_threshold,
            )),
            // Undefined z after warm-up: hold the previous state.
            (Some(previous), None) => Some(previous),
            (Some(previous), Some(z)) => Some(next_position(
                previous,
                *z,
                config.entry_threshold,
                config.exit_threshold,
            )),
        };
        positions.push(state);
    }

    Ok(SignalSeries {
        spread,
        z_score,
        positions,
    })
}
