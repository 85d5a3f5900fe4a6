//! Result rendering and persistence.
//!
//! Tabular stdout output for humans, pretty JSON on disk for the
//! reporting/plotting collaborators. Pair identifiers are always two
//! structured fields; nothing here ever needs to parse a combined
//! pair string back apart.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::backtest::BacktestResult;
use crate::error::PairLabError;
use crate::optimize::OptimizationOutcome;
use crate::scanner::{CointegrationResult, Pair, ScanReport};

/// Print the top of a scan report as an aligned table.
pub fn print_scan_table(report: &ScanReport, top: usize) {
    println!(
        "\n{:<20} | {:>12} | {:>12}",
        "Pair", "Statistic", "p-value"
    );
    println!("{}", "-".repeat(50));
    for result in report.results.iter().take(top) {
        println!(
            "{:<20} | {:>12.4} | {:>12.6}",
            result.pair.to_string(),
            result.test_statistic,
            result.p_value
        );
    }
    println!("{}", "-".repeat(50));
    println!(
        "{} cointegrated of {} tested ({} skipped)",
        report.results.len(),
        report.pairs_tested,
        report.pairs_skipped
    );
}

/// Print backtest summaries ranked by Sharpe ratio, best first.
pub fn print_backtest_table(results: &[BacktestResult]) {
    let mut ranked: Vec<&BacktestResult> = results.iter().collect();
    ranked.sort_by(|a, b| {
        b.sharpe_ratio
            .partial_cmp(&a.sharpe_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!(
        "\n{:<20} | {:>10} | {:>8} | {:>7} | {:>9} | {:>6}",
        "Pair", "Return", "CAGR", "Sharpe", "Max DD", "Trades"
    );
    println!("{}", "-".repeat(75));
    for result in ranked {
        println!(
            "{:<20} | {:>9.2}% | {:>7.2}% | {:>7.2} | {:>8.2}% | {:>6}",
            result.pair.to_string(),
            result.total_return * 100.0,
            result.cagr * 100.0,
            result.sharpe_ratio,
            result.max_drawdown * 100.0,
            result.trade_count
        );
    }
    println!("{}", "-".repeat(75));
}

/// Print the optimization grid as a window x threshold matrix of Sharpe
/// ratios, plus the winning cell.
pub fn print_optimization_grid(outcome: &OptimizationOutcome) {
    let mut windows: Vec<usize> = Vec::new();
    let mut thresholds: Vec<f64> = Vec::new();
    for cell in &outcome.grid {
        if !windows.contains(&cell.window) {
            windows.push(cell.window);
        }
        if !thresholds.iter().any(|t| *t == cell.entry_threshold) {
            thresholds.push(cell.entry_threshold);
        }
    }

    print!("\n{:>8} |", "window");
    for threshold in &thresholds {
        print!(" {:>8.2}", threshold);
    }
    println!();
    println!("{}", "-".repeat(10 + 9 * thresholds.len()));

    for window in &windows {
        print!("{:>8} |", window);
        for threshold in &thresholds {
            let sharpe = outcome
                .grid
                .iter()
                .find(|c| c.window == *window && c.entry_threshold == *threshold)
                .map(|c| c.sharpe_ratio)
                .unwrap_or(0.0);
            print!(" {:>8.2}", sharpe);
        }
        println!();
    }

    println!(
        "\nBest: window={}, entry={:.2}, sharpe={:.2}",
        outcome.best.window, outcome.best.entry_threshold, outcome.best.sharpe_ratio
    );
}

/// Persist scan results as pretty JSON.
pub fn save_scan_results(
    path: &Path,
    results: &[CointegrationResult],
) -> Result<(), PairLabError> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json)?;
    info!(path = %path.display(), pairs = results.len(), "Scan results saved");
    Ok(())
}

/// Load the pairs from a persisted scan-results file.
///
/// Only the two identifier fields are needed downstream; the statistics
/// ride along in the file for the reporting collaborator.
pub fn load_pairs(path: &Path) -> Result<Vec<Pair>, PairLabError> {
    let raw = fs::read_to_string(path)?;
    let results: Vec<CointegrationResult> = serde_json::from_str(&raw)?;
    Ok(results.into_iter().map(|r| r.pair).collect())
}

/// Persist backtest summaries as pretty JSON, ranked by Sharpe.
pub fn save_backtest_results(
    path: &Path,
    results: &[BacktestResult],
) -> Result<(), PairLabError> {
    let mut ranked = results.to_vec();
    ranked.sort_by(|a, b| {
        b.sharpe_ratio
            .partial_cmp(&a.sharpe_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let json = serde_json::to_string_pretty(&ranked)?;
    fs::write(path, json)?;
    info!(path = %path.display(), pairs = ranked.len(), "Backtest results saved");
    Ok(())
}

/// Persist an optimization outcome (grid plus best cell) as pretty JSON.
pub fn save_optimization(path: &Path, outcome: &OptimizationOutcome) -> Result<(), PairLabError> {
    let json = serde_json::to_string_pretty(outcome)?;
    fs::write(path, json)?;
    info!(path = %path.display(), cells = outcome.grid.len(), "Optimization grid saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_results_round_trip_is_structured() {
        let results = vec![CointegrationResult {
            pair: Pair::new("AMAT", "NXPI"),
            test_statistic: -3.9,
            p_value: 0.004,
        }];
        let dir = std::env::temp_dir().join("pairlab_report_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pairs.json");

        save_scan_results(&path, &results).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        // Two identifier fields, no combined representation.
        assert!(raw.contains("\"symbol_a\": \"AMAT\""));
        assert!(raw.contains("\"symbol_b\": \"NXPI\""));

        let pairs = load_pairs(&path).unwrap();
        assert_eq!(pairs, vec![Pair::new("AMAT", "NXPI")]);
        fs::remove_file(&path).ok();
    }
}
