//! Backtest command handler.
//!
//! Implements the `backtest` subcommand: for each requested pair, align
//! the histories, estimate the hedge ratio, generate signals and run the
//! backtest engine. Pairs without enough usable history are reported and
//! skipped; the survivors are ranked by Sharpe ratio.

use std::path::Path;

use tracing::{info, warn};

use crate::backtest;
use crate::config::AppConfig;
use crate::data::{load_price_table, PriceTable};
use crate::error::PairLabError;
use crate::hedge::{
    EstimatorKind, HedgeRatioEstimator, KalmanHedgeEstimator, OlsHedgeEstimator,
};
use crate::report;
use crate::scanner::Pair;
use crate::signal;

/// Parse an estimator name from the CLI.
fn parse_estimator(raw: &str) -> Result<EstimatorKind, PairLabError> {
    match raw.to_lowercase().as_str() {
        "static" | "ols" => Ok(EstimatorKind::Static),
        "kalman" | "dynamic" => Ok(EstimatorKind::Kalman),
        other => Err(PairLabError::InvalidConfig(format!(
            "unknown estimator {:?}, expected \"static\" or \"kalman\"",
            other
        ))),
    }
}

/// Parse a "SYMBOL_A,SYMBOL_B" pair argument.
pub(crate) fn parse_pair(raw: &str) -> Result<Pair, PairLabError> {
    let mut parts = raw.split(',').map(str::trim).filter(|s| !s.is_empty());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) if a != b => Ok(Pair::new(a, b)),
        _ => Err(PairLabError::InvalidConfig(format!(
            "pair must be two distinct comma-separated symbols, got {:?}",
            raw
        ))),
    }
}

/// Run backtests for the selected pairs.
///
/// # Errors
/// Returns an error on unusable inputs (missing table, no pairs); a pair
/// that cannot be evaluated is skipped with a warning.
#[allow(clippy::too_many_arguments)]
pub fn run_backtest(
    data_path: &str,
    pairs_path: Option<&str>,
    pair_arg: Option<&str>,
    estimator_arg: &str,
    window: Option<usize>,
    entry: Option<f64>,
    exit: Option<f64>,
    commission: Option<f64>,
    num_pairs: usize,
    output_path: &str,
    defaults: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- pairlab: Pair Backtest ---");

    let estimator_kind = parse_estimator(estimator_arg)?;

    let mut signal_config = defaults.signal.clone();
    if let Some(window) = window {
        signal_config.window = window;
    }
    if let Some(entry) = entry {
        signal_config.entry_threshold = entry;
    }
    if let Some(exit) = exit {
        signal_config.exit_threshold = exit;
    }

    let mut backtest_config = defaults.backtest.clone();
    if let Some(commission) = commission {
        backtest_config.commission_rate = commission;
    }

    let pairs: Vec<Pair> = match (pairs_path, pair_arg) {
        (Some(path), _) => {
            let all = report::load_pairs(Path::new(path))?;
            info!(path = %path, pairs = all.len(), "Loaded pairs file");
            all.into_iter().take(num_pairs).collect()
        }
        (None, Some(raw)) => vec![parse_pair(raw)?],
        (None, None) => {
            return Err(Box::new(PairLabError::InvalidConfig(
                "either --pairs or --pair is required".to_string(),
            )))
        }
    };

    let table = load_price_table(Path::new(data_path))?;

    info!(
        pairs = pairs.len(),
        estimator = ?estimator_kind,
        window = signal_config.window,
        entry = signal_config.entry_threshold,
        exit = signal_config.exit_threshold,
        commission = backtest_config.commission_rate,
        "Configuration loaded"
    );

    let mut results = Vec::new();
    let mut skipped = 0usize;
    for pair in &pairs {
        match evaluate_pair(
            &table,
            pair,
            estimator_kind,
            &signal_config,
            &backtest_config,
            defaults,
        ) {
            Ok(result) => results.push(result),
            Err(error) => {
                warn!(pair = %pair, %error, "Skipping pair");
                skipped += 1;
            }
        }
    }

    if results.is_empty() {
        warn!(skipped, "No pair produced a backtest result");
        return Ok(());
    }

    report::print_backtest_table(&results);
    if skipped > 0 {
        println!("({} pair(s) skipped)", skipped);
    }
    report::save_backtest_results(Path::new(output_path), &results)?;
    println!("\nSaved {} results to {}", results.len(), output_path);

    Ok(())
}

fn evaluate_pair(
    table: &PriceTable,
    pair: &Pair,
    estimator_kind: EstimatorKind,
    signal_config: &crate::config::SignalConfig,
    backtest_config: &crate::config::BacktestConfig,
    defaults: &AppConfig,
) -> Result<backtest::BacktestResult, PairLabError> {
    let aligned = table.pair_series(&pair.symbol_a, &pair.symbol_b)?;
    if aligned.is_empty() {
        return Err(PairLabError::InsufficientData {
            expected: 2,
            actual: 0,
        });
    }

    let hedge = match estimator_kind {
        EstimatorKind::Static => {
            OlsHedgeEstimator.estimate(&aligned.series_a, &aligned.series_b)?
        }
        EstimatorKind::Kalman => KalmanHedgeEstimator::new(defaults.kalman.clone())?
            .estimate(&aligned.series_a, &aligned.series_b)?,
    };

    let signals = signal::generate(
        &aligned.series_a,
        &aligned.series_b,
        &hedge,
        signal_config,
    )?;

    backtest::run(
        pair,
        &aligned.series_a,
        &aligned.series_b,
        &hedge,
        &signals.positions,
        backtest_config,
    )
}
