//! Grid-search optimization of signal parameters for a single pair.
//!
//! Sweeps the cross product of window lengths and entry thresholds,
//! re-running signal generation and the backtest for every cell. The
//! hedge ratio does not depend on either parameter, so the static OLS
//! estimate is computed once and shared. Cells are independent and
//! evaluate on the rayon pool; the grid keeps its window-major order so
//! the argmax tie-break (first occurrence wins) is deterministic.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backtest;
use crate::config::{BacktestConfig, OptimizeConfig, SignalConfig};
use crate::error::PairLabError;
use crate::hedge::{HedgeRatioEstimator, OlsHedgeEstimator};
use crate::scanner::Pair;
use crate::signal;

/// One evaluated cell of the parameter grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub window: usize,
    pub entry_threshold: f64,
    pub sharpe_ratio: f64,
}

/// Full sweep output: every cell plus the best one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    #[serde(flatten)]
    pub pair: Pair,
    pub best: GridCell,
    /// Window-major cross product of the configured candidates.
    pub grid: Vec<GridCell>,
}

/// Sweep the parameter grid for one pair.
///
/// `series_a`/`series_b` are the pair's overlapping non-missing history.
/// Errors only when the pair itself is unusable (degenerate regression,
/// too little history for any cell); individual oversized windows simply
/// produce an all-warm-up strategy and a Sharpe of zero.
pub fn optimize(
    pair: &Pair,
    series_a: &[f64],
    series_b: &[f64],
    config: &OptimizeConfig,
) -> Result<OptimizationOutcome, PairLabError> {
    config.validate().map_err(PairLabError::InvalidConfig)?;

    // Window/threshold choices never touch the hedge ratio; estimate once.
    let hedge = OlsHedgeEstimator.estimate(series_a, series_b)?;

    let cells: Vec<(usize, f64)> = config
        .windows
        .iter()
        .flat_map(|&window| {
            config
                .entry_thresholds
                .iter()
                .map(move |&threshold| (window, threshold))
        })
        .collect();

    info!(
        pair = %pair,
        windows = config.windows.len(),
        thresholds = config.entry_thresholds.len(),
        "Running grid search"
    );

    let backtest_config = BacktestConfig {
        commission_rate: config.commission_rate,
    };

    let grid: Vec<GridCell> = cells
        .par_iter()
        .map(|&(window, entry_threshold)| {
            let signal_config = SignalConfig {
                window,
                entry_threshold,
                exit_threshold: config.exit_threshold,
            };
            let signals = signal::generate(series_a, series_b, &hedge, &signal_config)?;
            let result = backtest::run(
                pair,
                series_a,
                series_b,
                &hedge,
                &signals.positions,
                &backtest_config,
            )?;
            Ok(GridCell {
                window,
                entry_threshold,
                sharpe_ratio: result.sharpe_ratio,
            })
        })
        .collect::<Result<Vec<_>, PairLabError>>()?;

    // Sequential argmax: strict comparison keeps the first maximal cell.
    let mut best = grid[0].clone();
    for cell in &grid[1..] {
        if cell.sharpe_ratio > best.sharpe_ratio {
            best = cell.clone();
        }
    }

    info!(
        pair = %pair,
        window = best.window,
        entry = best.entry_threshold,
        sharpe = best.sharpe_ratio,
        "Grid search complete"
    );

    Ok(OptimizationOutcome {
        pair: pair.clone(),
        best,
        grid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hedge::HedgeRatio;

    fn noisy_pair(n: usize) -> (Vec<f64>, Vec<f64>) {
        let mut base = 100.0;
        let mut a = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        for i in 0..n {
            base += 0.2 + ((i * 31 + 7) % 97) as f64 / 97.0 - 0.5;
            a.push(base + ((i * 17) % 13) as f64 / 4.0);
            b.push(base / 1.5);
        }
        (a, b)
    }

    #[test]
    fn test_grid_covers_full_cross_product_in_order() {
        let (a, b) = noisy_pair(200);
        let config = OptimizeConfig {
            windows: vec![20, 40],
            entry_thresholds: vec![1.0, 2.0],
            exit_threshold: 0.5,
            commission_rate: 0.001,
        };
        let outcome = optimize(&Pair::new("AAA", "BBB"), &a, &b, &config).unwrap();
        let keys: Vec<(usize, f64)> = outcome
            .grid
            .iter()
            .map(|c| (c.window, c.entry_threshold))
            .collect();
        assert_eq!(keys, vec![(20, 1.0), (20, 2.0), (40, 1.0), (40, 2.0)]);
    }

    #[test]
    fn test_single_cell_matches_direct_backtest() {
        let (a, b) = noisy_pair(250);
        let pair = Pair::new("AAA", "BBB");
        let config = OptimizeConfig {
            windows: vec![60],
            entry_thresholds: vec![2.0],
            exit_threshold: 0.5,
            commission_rate: 0.001,
        };

        let outcome = optimize(&pair, &a, &b, &config).unwrap();
        assert_eq!(outcome.grid.len(), 1);

        let hedge = OlsHedgeEstimator.estimate(&a, &b).unwrap();
        let signals = signal::generate(
            &a,
            &b,
            &hedge,
            &SignalConfig {
                window: 60,
                entry_threshold: 2.0,
                exit_threshold: 0.5,
            },
        )
        .unwrap();
        let direct = backtest::run(
            &pair,
            &a,
            &b,
            &hedge,
            &signals.positions,
            &BacktestConfig {
                commission_rate: 0.001,
            },
        )
        .unwrap();

        assert_eq!(outcome.best.sharpe_ratio, direct.sharpe_ratio);
    }

    #[test]
    fn test_tie_break_first_occurrence() {
        // Every window larger than the history yields Sharpe 0; the best
        // cell must be the first one in iteration order.
        let (a, b) = noisy_pair(30);
        let config = OptimizeConfig {
            windows: vec![50, 60],
            entry_thresholds: vec![1.0, 2.0],
            exit_threshold: 0.5,
            commission_rate: 0.001,
        };
        let outcome = optimize(&Pair::new("AAA", "BBB"), &a, &b, &config).unwrap();
        assert!(outcome.grid.iter().all(|c| c.sharpe_ratio == 0.0));
        assert_eq!(outcome.best.window, 50);
        assert_eq!(outcome.best.entry_threshold, 1.0);
    }

    #[test]
    fn test_oversized_window_cell_is_flat_not_error() {
        let (a, b) = noisy_pair(80);
        let hedge = OlsHedgeEstimator.estimate(&a, &b).unwrap();
        assert!(matches!(hedge, HedgeRatio::Static(_)));

        let config = OptimizeConfig {
            windows: vec![200],
            entry_thresholds: vec![2.0],
            exit_threshold: 0.5,
            commission_rate: 0.001,
        };
        let outcome = optimize(&Pair::new("AAA", "BBB"), &a, &b, &config).unwrap();
        assert_eq!(outcome.grid[0].sharpe_ratio, 0.0);
    }
}
