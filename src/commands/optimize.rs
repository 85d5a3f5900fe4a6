//! Optimize command handler.
//!
//! Implements the `optimize` subcommand: grid-search window and
//! entry-threshold candidates for a single pair, print the Sharpe matrix
//! and persist the full grid.

use std::path::Path;

use tracing::info;

use crate::config::AppConfig;
use crate::data::load_price_table;
use crate::error::PairLabError;
use crate::optimize;
use crate::report;

use super::backtest::parse_pair;

fn parse_list<T: std::str::FromStr>(raw: &str, what: &str) -> Result<Vec<T>, PairLabError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<T>().map_err(|_| {
                PairLabError::InvalidConfig(format!("unparseable {} value: {:?}", what, s))
            })
        })
        .collect()
}

/// Run the parameter grid search for one pair.
///
/// # Errors
/// Returns an error if the table or pair cannot be used, or the grid
/// configuration is invalid.
#[allow(clippy::too_many_arguments)]
pub fn run_optimize(
    data_path: &str,
    pair_arg: &str,
    windows_arg: Option<&str>,
    thresholds_arg: Option<&str>,
    exit: Option<f64>,
    commission: Option<f64>,
    output_path: &str,
    defaults: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- pairlab: Parameter Optimization ---");

    let pair = parse_pair(pair_arg)?;

    let mut config = defaults.optimize.clone();
    if let Some(raw) = windows_arg {
        config.windows = parse_list(raw, "window")?;
    }
    if let Some(raw) = thresholds_arg {
        config.entry_thresholds = parse_list(raw, "threshold")?;
    }
    if let Some(exit) = exit {
        config.exit_threshold = exit;
    }
    if let Some(commission) = commission {
        config.commission_rate = commission;
    }

    let table = load_price_table(Path::new(data_path))?;
    let aligned = table.pair_series(&pair.symbol_a, &pair.symbol_b)?;

    info!(
        pair = %pair,
        overlap = aligned.len(),
        windows = config.windows.len(),
        thresholds = config.entry_thresholds.len(),
        "Configuration loaded"
    );

    let outcome = optimize::optimize(&pair, &aligned.series_a, &aligned.series_b, &config)?;

    report::print_optimization_grid(&outcome);
    report::save_optimization(Path::new(output_path), &outcome)?;
    println!("\nSaved {} grid cells to {}", outcome.grid.len(), output_path);

    Ok(())
}
