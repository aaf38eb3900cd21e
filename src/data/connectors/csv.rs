use crate::config::DataConfig;
use crate::data::provider::PriceProvider;
use crate::error::{PricebiasError, Result};
use crate::types::PriceSeries;
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use super::validator::DataValidator;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads daily closes from `<data_dir>/<SYMBOL>.csv`.
pub struct CsvConnector {
    data_dir: PathBuf,
    date_column: String,
    price_column: String,
}

impl CsvConnector {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            date_column: "date".to_string(),
            price_column: "close".to_string(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.data_dir.clone())
            .with_columns(&config.date_column, &config.price_column)
    }

    pub fn with_columns(mut self, date_column: &str, price_column: &str) -> Self {
        self.date_column = date_column.to_string();
        self.price_column = price_column.to_string();
        self
    }

    pub fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }

    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PricebiasError::DataUnavailable(format!(
                "price file not found: {}",
                path.display()
            )));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| PricebiasError::DataUnavailable(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Dated closes inside `[start, end]`, sorted by date. Rows with a
    /// missing date or close are skipped.
    pub fn extract_closes(
        &self,
        df: &DataFrame,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        let columns = [self.date_column.as_str(), self.price_column.as_str()];
        DataValidator::validate_columns(df, &columns)?;

        let null_report = DataValidator::check_nulls(df, &columns)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected, affected rows skipped: {:?}", null_report);
        }

        let dates = df.column(&self.date_column)?.cast(&DataType::String)?;
        let closes = df.column(&self.price_column)?.cast(&DataType::Float64)?;

        let mut bars = Vec::with_capacity(df.height());
        for (row, (date, close)) in dates.str()?.into_iter().zip(closes.f64()?.into_iter()).enumerate() {
            let (Some(date), Some(close)) = (date, close) else {
                continue;
            };

            let date = Self::parse_date(date).ok_or_else(|| {
                PricebiasError::DataUnavailable(format!(
                    "unparseable date '{}' at row {}",
                    date, row
                ))
            })?;

            if date >= start && date <= end {
                bars.push((date, close));
            }
        }

        bars.sort_by_key(|(date, _)| *date);
        Ok(bars)
    }

    /// Accepts `YYYY-MM-DD`, optionally followed by a time component.
    fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
    }
}

impl PriceProvider for CsvConnector {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        DataValidator::validate_range(start, end)?;

        let path = self.symbol_path(symbol);
        let df = Self::load(&path)?;
        let bars = self.extract_closes(&df, start, end)?;

        log::info!(
            "Loaded {} closes for {} ({} to {}) from {}",
            bars.len(),
            symbol,
            start,
            end,
            path.display()
        );

        DataValidator::to_series(symbol, bars.into_iter().map(|(_, close)| close).collect())
    }
}
