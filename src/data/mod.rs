//! Price table data model.
//!
//! A [`PriceTable`] is a date-indexed matrix of adjusted close prices, one
//! column per instrument, all columns aligned to a single ascending date
//! axis. Gaps are represented as `None`, never as zero, so that downstream
//! statistics cannot silently absorb missing observations.

mod loader;

pub use loader::load_price_table;

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::PairLabError;

/// Date-aligned price matrix for a universe of instruments.
#[derive(Debug, Clone)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    /// Column-major storage, one vector per symbol, aligned 1:1 with `dates`.
    columns: Vec<Vec<Option<f64>>>,
    index: HashMap<String, usize>,
}

/// The overlapping non-missing history of two instruments.
///
/// Rows where either leg is missing are dropped; the remaining rows keep
/// their original dates and relative order.
#[derive(Debug, Clone)]
pub struct AlignedPair {
    pub dates: Vec<NaiveDate>,
    pub series_a: Vec<f64>,
    pub series_b: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.series_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series_a.is_empty()
    }
}

impl PriceTable {
    /// Build a table from a shared date axis and per-symbol columns.
    ///
    /// Validates that dates are strictly ascending (no duplicates), that
    /// every column matches the axis length, and that symbols are unique.
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self, PairLabError> {
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(PairLabError::InvalidConfig(format!(
                    "date axis must be strictly ascending, found {} after {}",
                    pair[1], pair[0]
                )));
            }
        }

        let mut symbols = Vec::with_capacity(columns.len());
        let mut storage = Vec::with_capacity(columns.len());
        let mut index = HashMap::with_capacity(columns.len());

        for (symbol, column) in columns {
            if column.len() != dates.len() {
                return Err(PairLabError::InvalidConfig(format!(
                    "column {} has {} rows, expected {}",
                    symbol,
                    column.len(),
                    dates.len()
                )));
            }
            if index.contains_key(&symbol) {
                return Err(PairLabError::InvalidConfig(format!(
                    "duplicate instrument column: {}",
                    symbol
                )));
            }
            index.insert(symbol.clone(), storage.len());
            symbols.push(symbol);
            storage.push(column);
        }

        Ok(Self {
            dates,
            symbols,
            columns: storage,
            index,
        })
    }

    /// Number of rows (dates) in the table.
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    /// Instrument identifiers in column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// The shared ascending date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// A single instrument's column, if present.
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.index.get(symbol).map(|&i| self.columns[i].as_slice())
    }

    /// Extract the overlapping non-missing history of two instruments.
    ///
    /// Returns an error if either symbol is unknown. An empty overlap is
    /// not an error here; callers decide whether to skip the pair.
    pub fn pair_series(&self, symbol_a: &str, symbol_b: &str) -> Result<AlignedPair, PairLabError> {
        let col_a = self
            .column(symbol_a)
            .ok_or_else(|| PairLabError::UnknownInstrument(symbol_a.to_string()))?;
        let col_b = self
            .column(symbol_b)
            .ok_or_else(|| PairLabError::UnknownInstrument(symbol_b.to_string()))?;

        let mut dates = Vec::new();
        let mut series_a = Vec::new();
        let mut series_b = Vec::new();

        for (i, date) in self.dates.iter().enumerate() {
            if let (Some(a), Some(b)) = (col_a[i], col_b[i]) {
                dates.push(*date);
                series_a.push(a);
                series_b.push(b);
            }
        }

        Ok(AlignedPair {
            dates,
            series_a,
            series_b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_table() -> PriceTable {
        let dates = vec![
            date("2024-01-02"),
            date("2024-01-03"),
            date("2024-01-04"),
            date("2024-01-05"),
        ];
        PriceTable::from_columns(
            dates,
            vec![
                (
                    "AAA".to_string(),
                    vec![Some(10.0), Some(11.0), None, Some(12.0)],
                ),
                (
                    "BBB".to_string(),
                    vec![Some(20.0), Some(21.0), Some(22.0), Some(23.0)],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_pair_series_drops_missing_rows() {
        let table = sample_table();
        let pair = table.pair_series("AAA", "BBB").unwrap();
        assert_eq!(pair.len(), 3);
        assert_eq!(pair.series_a, vec![10.0, 11.0, 12.0]);
        assert_eq!(pair.series_b, vec![20.0, 21.0, 23.0]);
        assert_eq!(pair.dates[2], date("2024-01-05"));
    }

    #[test]
    fn test_unknown_symbol_is_error() {
        let table = sample_table();
        assert!(table.pair_series("AAA", "ZZZ").is_err());
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let dates = vec![date("2024-01-02"), date("2024-01-02")];
        let result = PriceTable::from_columns(
            dates,
            vec![("AAA".to_string(), vec![Some(1.0), Some(2.0)])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_column_length_mismatch_rejected() {
        let dates = vec![date("2024-01-02"), date("2024-01-03")];
        let result =
            PriceTable::from_columns(dates, vec![("AAA".to_string(), vec![Some(1.0)])]);
        assert!(result.is_err());
    }
}
