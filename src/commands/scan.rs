//! Scan command handler.
//!
//! Implements the `scan` subcommand: load the price table, test every
//! unique pair for cointegration, print the top of the ranking and
//! persist the full accepted list.

use std::path::Path;

use tracing::info;

use crate::config::AppConfig;
use crate::data::load_price_table;
use crate::report;
use crate::scanner;

/// Run the cointegration scan over a price CSV.
///
/// # Errors
/// Returns an error if the table cannot be loaded or the output cannot
/// be written; per-pair test failures are skips, not errors.
pub fn run_scan(
    data_path: &str,
    p_threshold: Option<f64>,
    min_observations: Option<usize>,
    top: usize,
    output_path: &str,
    defaults: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- pairlab: Cointegration Scan ---");

    let mut config = defaults.scan.clone();
    if let Some(p) = p_threshold {
        config.p_value_threshold = p;
    }
    if let Some(min) = min_observations {
        config.min_observations = min;
    }

    let table = load_price_table(Path::new(data_path))?;
    info!(
        instruments = table.symbols().len(),
        rows = table.height(),
        p_threshold = config.p_value_threshold,
        "Configuration loaded"
    );

    let report = scanner::scan(&table, &config)?;

    report::print_scan_table(&report, top);
    report::save_scan_results(Path::new(output_path), &report.results)?;

    println!("\nSaved {} pairs to {}", report.results.len(), output_path);
    Ok(())
}
