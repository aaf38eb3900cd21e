use crate::error::{PricebiasError, Result};
use crate::types::PriceSeries;
use chrono::NaiveDate;
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Reject empty or inverted date ranges
    pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
        if start >= end {
            return Err(PricebiasError::DataUnavailable(format!(
                "invalid date range: start {} is not before end {}",
                start, end
            )));
        }
        Ok(())
    }

    /// Check that every named column exists in the DataFrame
    pub fn validate_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
        let columns = df.get_column_names();
        for name in required {
            if !columns.iter().any(|col| col.as_str() == *name) {
                return Err(PricebiasError::DataUnavailable(format!(
                    "Missing required column: {} (found: {:?})",
                    name, columns
                )));
            }
        }
        Ok(())
    }

    /// Check for null values in critical columns
    pub fn check_nulls(df: &DataFrame, columns: &[&str]) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for name in columns {
            let null_count = df.column(name)?.null_count();
            if null_count > 0 {
                null_report.push((name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }

    /// Wrap loaded closes, distinguishing "nothing in range" from "too short".
    pub fn to_series(symbol: &str, closes: Vec<f64>) -> Result<PriceSeries> {
        if closes.is_empty() {
            return Err(PricebiasError::DataUnavailable(format!(
                "no prices for {} in the requested range",
                symbol
            )));
        }
        PriceSeries::new(closes)
    }
}
