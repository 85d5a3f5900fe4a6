//! Property-based tests for financial calculations
//!
//! These tests use proptest to verify invariants across many random inputs,
//! catching edge cases that unit tests might miss.

use proptest::prelude::*;

use pairlab::backtest;
use pairlab::config::{BacktestConfig, KalmanConfig, SignalConfig};
use pairlab::hedge::HedgeRatio;
use pairlab::math::rolling::{rolling_mean, rolling_std};
use pairlab::math::KalmanRatioFilter;
use pairlab::scanner::Pair;
use pairlab::signal::{self, Position};

/// Turn a sequence of bounded relative moves into a positive price path.
fn price_path(start: f64, moves: &[f64]) -> Vec<f64> {
    let mut path = Vec::with_capacity(moves.len() + 1);
    let mut level = start;
    path.push(level);
    for m in moves {
        level *= 1.0 + m;
        path.push(level);
    }
    path
}

proptest! {
    /// Rolling z-scores are finite wherever they are defined.
    #[test]
    fn zscore_is_finite_where_defined(
        values in prop::collection::vec(-1000.0f64..1000.0f64, 10..100),
        window in 2usize..20
    ) {
        let means = rolling_mean(&values, window);
        let stds = rolling_std(&values, window);
        for ((value, mean), std) in values.iter().zip(means.iter()).zip(stds.iter()) {
            if let (Some(mean), Some(std)) = (mean, std) {
                if *std > 0.0 {
                    let z = (value - mean) / std;
                    prop_assert!(z.is_finite(), "z-score should be finite: {}", z);
                }
            }
        }
    }

    /// Rolling std is never negative and warm-up is exactly window - 1.
    #[test]
    fn rolling_std_warmup_contract(
        values in prop::collection::vec(-100.0f64..100.0f64, 5..80),
        window in 2usize..20
    ) {
        let stds = rolling_std(&values, window);
        for (i, std) in stds.iter().enumerate() {
            if i + 1 < window || values.len() < window {
                prop_assert!(std.is_none());
            } else {
                prop_assert!(std.is_some());
                prop_assert!(std.unwrap() >= 0.0);
            }
        }
    }

    /// A higher commission can never improve the outcome, holding
    /// positions and prices fixed.
    #[test]
    fn commission_monotonicity(
        moves_a in prop::collection::vec(-0.05f64..0.05f64, 30..60),
        moves_b in prop::collection::vec(-0.05f64..0.05f64, 30..60)
    ) {
        let n = moves_a.len().min(moves_b.len());
        let a = price_path(100.0, &moves_a[..n]);
        let b = price_path(80.0, &moves_b[..n]);
        let hedge = HedgeRatio::Static(1.0);

        let signals = signal::generate(&a, &b, &hedge, &SignalConfig {
            window: 10,
            entry_threshold: 1.0,
            exit_threshold: 0.25,
        }).unwrap();

        let pair = Pair::new("AAA", "BBB");
        let cheap = backtest::run(&pair, &a, &b, &hedge, &signals.positions,
            &BacktestConfig { commission_rate: 0.001 }).unwrap();
        let expensive = backtest::run(&pair, &a, &b, &hedge, &signals.positions,
            &BacktestConfig { commission_rate: 0.002 }).unwrap();

        prop_assert_eq!(cheap.trade_count, expensive.trade_count);
        prop_assert!(expensive.total_return <= cheap.total_return + 1e-12);
    }

    /// Max drawdown is never positive.
    #[test]
    fn max_drawdown_is_non_positive(
        moves_a in prop::collection::vec(-0.05f64..0.05f64, 20..50),
        moves_b in prop::collection::vec(-0.05f64..0.05f64, 20..50)
    ) {
        let n = moves_a.len().min(moves_b.len());
        let a = price_path(120.0, &moves_a[..n]);
        let b = price_path(90.0, &moves_b[..n]);
        let hedge = HedgeRatio::Static(1.3);

        let signals = signal::generate(&a, &b, &hedge, &SignalConfig {
            window: 8,
            entry_threshold: 1.0,
            exit_threshold: 0.25,
        }).unwrap();

        let result = backtest::run(&Pair::new("AAA", "BBB"), &a, &b, &hedge,
            &signals.positions, &BacktestConfig::default()).unwrap();
        prop_assert!(result.max_drawdown <= 0.0);
    }

    /// The position sequence obeys the hysteresis contract: defined from
    /// the first defined z-score onward, and every exit-to-Flat happens
    /// only once the z-score has reverted past the exit threshold.
    #[test]
    fn position_sequence_is_legal(
        moves_a in prop::collection::vec(-0.05f64..0.05f64, 30..80),
        moves_b in prop::collection::vec(-0.05f64..0.05f64, 30..80)
    ) {
        let n = moves_a.len().min(moves_b.len());
        let a = price_path(100.0, &moves_a[..n]);
        let b = price_path(100.0, &moves_b[..n]);
        let hedge = HedgeRatio::Static(1.0);
        let entry = 1.5;
        let exit = 0.5;

        let signals = signal::generate(&a, &b, &hedge, &SignalConfig {
            window: 10,
            entry_threshold: entry,
            exit_threshold: exit,
        }).unwrap();

        let mut seen_defined = false;
        for t in 0..signals.positions.len() {
            match signals.positions[t] {
                Some(current) => {
                    if !seen_defined {
                        seen_defined = true;
                    } else {
                        let previous = signals.positions[t - 1].unwrap();
                        check_transition(previous, current, signals.z_score[t], entry, exit)?;
                    }
                }
                None => prop_assert!(
                    !seen_defined,
                    "positions must stay defined after warm-up"
                ),
            }
        }
    }

    /// The Kalman estimate at any timestamp is independent of what
    /// follows it.
    #[test]
    fn kalman_prefix_determinism(
        observations in prop::collection::vec(0.5f64..2.0f64, 5..60),
        cut in 1usize..50
    ) {
        let cut = cut.min(observations.len());
        let config = KalmanConfig::default();

        let mut full = KalmanRatioFilter::new(&config);
        let full_path: Vec<f64> =
            observations.iter().map(|&z| full.update(z)).collect();

        let mut prefix = KalmanRatioFilter::new(&config);
        let mut last = config.initial_mean;
        for &z in &observations[..cut] {
            last = prefix.update(z);
        }
        prop_assert_eq!(last, full_path[cut - 1]);
    }
}

fn check_transition(
    previous: Position,
    current: Position,
    z: Option<f64>,
    entry: f64,
    exit: f64,
) -> Result<(), TestCaseError> {
    match z {
        // Undefined z after warm-up must carry the state.
        None => prop_assert_eq!(previous, current),
        Some(z) => match (previous, current) {
            (Position::Long, Position::Long) => {
                // Holding Long: the exit boundary was not crossed.
                prop_assert!(z < -exit, "Long hold with z = {}", z)
            }
            (_, Position::Long) => {
                prop_assert!(z < -entry, "Long entry requires z < -entry, z = {}", z)
            }
            (Position::Short, Position::Short) => {
                prop_assert!(z > exit, "Short hold with z = {}", z)
            }
            (_, Position::Short) => {
                prop_assert!(z > entry, "Short entry requires z > entry, z = {}", z)
            }
            (Position::Long, Position::Flat) => {
                prop_assert!(z >= -exit, "Long exit requires reversion, z = {}", z)
            }
            (Position::Short, Position::Flat) => {
                prop_assert!(z <= exit, "Short exit requires reversion, z = {}", z)
            }
            (Position::Flat, Position::Flat) => {}
        },
    }
    Ok(())
}
