//! Cointegration screening over a price table.
//!
//! Tests every unique instrument pair for a stationary linear combination
//! and ranks the survivors by p-value. Per-pair tests are independent and
//! run on the rayon pool; pairs the test cannot handle are skipped and
//! counted, never fatal.

mod engle_granger;

pub use engle_granger::{engle_granger_test, EngleGrangerOutcome, MIN_TEST_OBSERVATIONS};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::data::PriceTable;
use crate::error::PairLabError;

/// An unordered instrument pair with a caller-fixed canonical order.
///
/// Persisted as two structured fields; recovering the identifiers never
/// requires parsing a combined representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub symbol_a: String,
    pub symbol_b: String,
}

impl Pair {
    pub fn new(symbol_a: impl Into<String>, symbol_b: impl Into<String>) -> Self {
        Self {
            symbol_a: symbol_a.into(),
            symbol_b: symbol_b.into(),
        }
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.symbol_a, self.symbol_b)
    }
}

/// One accepted pair from a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CointegrationResult {
    #[serde(flatten)]
    pub pair: Pair,
    pub test_statistic: f64,
    pub p_value: f64,
}

/// Scan output plus diagnostics about the pairs that produced nothing.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Accepted pairs, ascending by p-value.
    pub results: Vec<CointegrationResult>,
    /// Unique pairs considered.
    pub pairs_tested: usize,
    /// Pairs dropped for insufficient overlap or numerical degeneracy.
    pub pairs_skipped: usize,
}

enum PairOutcome {
    Accepted(CointegrationResult),
    Rejected,
    Skipped,
}

/// Test every unique pair in the table and rank the cointegrated ones.
pub fn scan(prices: &PriceTable, config: &ScanConfig) -> Result<ScanReport, PairLabError> {
    config.validate().map_err(PairLabError::InvalidConfig)?;

    let symbols = prices.symbols();
    let mut candidates = Vec::new();
    for i in 0..symbols.len() {
        for j in (i + 1)..symbols.len() {
            candidates.push((symbols[i].clone(), symbols[j].clone()));
        }
    }

    info!(
        instruments = symbols.len(),
        pairs = candidates.len(),
        p_threshold = config.p_value_threshold,
        "Scanning for cointegrated pairs"
    );

    let outcomes: Vec<PairOutcome> = candidates
        .par_iter()
        .map(|(symbol_a, symbol_b)| test_pair(prices, symbol_a, symbol_b, config))
        .collect();

    let mut results = Vec::new();
    let mut pairs_skipped = 0;
    for outcome in outcomes {
        match outcome {
            PairOutcome::Accepted(result) => results.push(result),
            PairOutcome::Rejected => {}
            PairOutcome::Skipped => pairs_skipped += 1,
        }
    }

    results.sort_by(|a, b| {
        a.p_value
            .partial_cmp(&b.p_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    info!(
        accepted = results.len(),
        tested = candidates.len(),
        skipped = pairs_skipped,
        "Scan complete"
    );

    Ok(ScanReport {
        results,
        pairs_tested: candidates.len(),
        pairs_skipped,
    })
}

fn test_pair(
    prices: &PriceTable,
    symbol_a: &str,
    symbol_b: &str,
    config: &ScanConfig,
) -> PairOutcome {
    let aligned = match prices.pair_series(symbol_a, symbol_b) {
        Ok(aligned) => aligned,
        Err(_) => return PairOutcome::Skipped,
    };

    if aligned.len() < config.min_observations {
        debug!(
            pair = %format!("{}-{}", symbol_a, symbol_b),
            overlap = aligned.len(),
            required = config.min_observations,
            "Insufficient overlap, skipping pair"
        );
        return PairOutcome::Skipped;
    }

    match engle_granger_test(&aligned.series_a, &aligned.series_b, config.max_lag) {
        Ok(outcome) if outcome.p_value < config.p_value_threshold => {
            PairOutcome::Accepted(CointegrationResult {
                pair: Pair::new(symbol_a, symbol_b),
                test_statistic: outcome.test_statistic,
                p_value: outcome.p_value,
            })
        }
        Ok(_) => PairOutcome::Rejected,
        Err(error) => {
            debug!(
                pair = %format!("{}-{}", symbol_a, symbol_b),
                %error,
                "Test failed, skipping pair"
            );
            PairOutcome::Skipped
        }
    }
}
