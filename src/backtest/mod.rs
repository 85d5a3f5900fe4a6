//! Backtest engine for a single pair strategy.
//!
//! Converts a position sequence into a net return series and summary
//! performance metrics. The accounting is strictly causal: the position
//! decided with information through `t-1` earns (or loses) today's
//! return, and for a dynamic hedge ratio the previous day's estimate
//! scales today's second-leg return.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BacktestConfig;
use crate::error::PairLabError;
use crate::hedge::HedgeRatio;
use crate::scanner::Pair;
use crate::signal::Position;

/// Trading days per year for annualization.
pub const ANNUALIZATION_FACTOR: f64 = 252.0;

/// Summary performance of one (pair, parameter-set) evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(flatten)]
    pub pair: Pair,
    /// Final equity minus one.
    pub total_return: f64,
    /// Compound annual growth rate over the simulated span.
    pub cagr: f64,
    /// Annualized mean-over-std of net returns; 0 when dispersion is 0.
    pub sharpe_ratio: f64,
    /// Worst peak-to-trough equity decline; non-positive.
    pub max_drawdown: f64,
    /// Number of timestamps where the position changed.
    pub trade_count: u32,
}

/// Run the backtest over a pair's aligned history.
///
/// `positions` is the generator's output: `None` during warm-up, then a
/// defined stance per timestamp. Errors on inconsistent input lengths,
/// non-positive prices, or fewer than two observations; callers treat
/// those pairs as skips.
pub fn run(
    pair: &Pair,
    series_a: &[f64],
    series_b: &[f64],
    hedge: &HedgeRatio,
    positions: &[Option<Position>],
    config: &BacktestConfig,
) -> Result<BacktestResult, PairLabError> {
    config.validate().map_err(PairLabError::InvalidConfig)?;

    let n = series_a.len();
    if series_b.len() != n || positions.len() != n {
        return Err(PairLabError::InvalidConfig(format!(
            "misaligned backtest inputs: prices {}/{}, positions {}",
            n,
            series_b.len(),
            positions.len()
        )));
    }
    if let Some(hedge_len) = hedge.len() {
        if hedge_len != n {
            return Err(PairLabError::InvalidConfig(format!(
                "hedge ratio path has {} values for {} timestamps",
                hedge_len, n
            )));
        }
    }
    if n < 2 {
        return Err(PairLabError::InsufficientData {
            expected: 2,
            actual: n,
        });
    }
    if series_a.iter().chain(series_b.iter()).any(|p| *p <= 0.0) {
        return Err(PairLabError::Degenerate(
            "non-positive price in backtest input".to_string(),
        ));
    }

    let net_returns = net_return_series(series_a, series_b, hedge, positions, config);
    let trade_count = count_trades(positions);

    // Equity curve: cumulative product of (1 + net), starting at 1.
    let mut equity = Vec::with_capacity(net_returns.len());
    let mut level = 1.0;
    for net in &net_returns {
        level *= 1.0 + net;
        equity.push(level);
    }
    let final_equity = level;

    let result = if final_equity <= 0.0 {
        // Total loss: fractional powers of a non-positive base are
        // undefined, so the metrics collapse to their floor values.
        BacktestResult {
            pair: pair.clone(),
            total_return: -1.0,
            cagr: -1.0,
            sharpe_ratio: 0.0,
            max_drawdown: -1.0,
            trade_count,
        }
    } else {
        let observations = net_returns.len() as f64;
        BacktestResult {
            pair: pair.clone(),
            total_return: final_equity - 1.0,
            cagr: final_equity.powf(ANNUALIZATION_FACTOR / observations) - 1.0,
            sharpe_ratio: sharpe_ratio(&net_returns),
            max_drawdown: max_drawdown(&equity),
            trade_count,
        }
    };

    debug!(
        pair = %pair,
        total_return = result.total_return,
        sharpe = result.sharpe_ratio,
        trades = result.trade_count,
        "Backtest complete"
    );

    Ok(result)
}

/// Net return per step: previous-day position applied to today's spread
/// return, minus commission on any position change today.
fn net_return_series(
    series_a: &[f64],
    series_b: &[f64],
    hedge: &HedgeRatio,
    positions: &[Option<Position>],
    config: &BacktestConfig,
) -> Vec<f64> {
    let direction = |p: Option<Position>| p.map(Position::direction).unwrap_or(0.0);

    (1..series_a.len())
        .map(|t| {
            let return_a = series_a[t] / series_a[t - 1] - 1.0;
            let return_b = series_b[t] / series_b[t - 1] - 1.0;
            let gross =
                direction(positions[t - 1]) * (return_a - hedge.value_at(t - 1) * return_b);

            let turnover = (direction(positions[t]) - direction(positions[t - 1])).abs();
            gross - config.commission_rate * turnover
        })
        .collect()
}

fn count_trades(positions: &[Option<Position>]) -> u32 {
    let direction = |p: Option<Position>| p.map(Position::direction).unwrap_or(0.0);
    positions
        .windows(2)
        .filter(|w| direction(w[0]) != direction(w[1]))
        .count() as u32
}

/// Annualized Sharpe ratio with a sample (n - 1) standard deviation.
fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    if std_dev.abs() < f64::EPSILON {
        return 0.0;
    }

    (mean / std_dev) * ANNUALIZATION_FACTOR.sqrt()
}

/// Minimum of (equity - running max) / running max; 0 only when the
/// curve never declines.
fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0f64;
    for &level in equity {
        peak = peak.max(level);
        let drawdown = (level - peak) / peak;
        worst = worst.min(drawdown);
    }
    worst
}
