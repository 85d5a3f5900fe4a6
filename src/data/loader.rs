//! CSV ingestion for the price table.
//!
//! Expects the layout produced by the (out-of-scope) data-acquisition
//! collaborator: first column is the date index, every other column is one
//! instrument's adjusted close. Empty cells and non-finite values load as
//! missing.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::info;

use super::PriceTable;
use crate::error::PairLabError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn parse_date(raw: &str) -> Result<NaiveDate, PairLabError> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    Err(PairLabError::DateParse(format!(
        "unparseable date index value: {:?}",
        raw
    )))
}

/// Load a date-indexed close-price CSV into a [`PriceTable`].
pub fn load_price_table(path: &Path) -> Result<PriceTable, PairLabError> {
    info!(path = %path.display(), "Loading price table");

    let file = File::open(path)?;
    let df = CsvReader::new(file).has_header(true).finish()?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if names.len() < 2 {
        return Err(PairLabError::InvalidConfig(
            "price CSV needs a date column and at least one instrument column".to_string(),
        ));
    }

    // First column is the date index.
    let date_series = df.column(&names[0])?;
    let date_strings = date_series.cast(&DataType::Utf8)?;
    let date_strings = date_strings.utf8()?;

    let mut dates = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        match date_strings.get(i) {
            Some(raw) => dates.push(parse_date(raw)?),
            None => {
                return Err(PairLabError::DateParse(format!(
                    "missing date index at row {}",
                    i
                )))
            }
        }
    }

    let mut columns = Vec::with_capacity(names.len() - 1);
    for name in &names[1..] {
        let series = df.column(name)?.cast(&DataType::Float64)?;
        let values = series.f64()?;
        let column: Vec<Option<f64>> = (0..df.height())
            .map(|i| values.get(i).filter(|v| v.is_finite()))
            .collect();
        columns.push((name.clone(), column));
    }

    let table = PriceTable::from_columns(dates, columns)?;
    info!(
        instruments = table.symbols().len(),
        rows = table.height(),
        "Price table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-31").is_ok());
        assert!(parse_date("2024/01/31").is_ok());
        assert!(parse_date("01/31/2024").is_ok());
        assert!(parse_date("31st of January").is_err());
    }
}
