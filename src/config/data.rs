use super::traits::ConfigSection;
use crate::error::PricebiasError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the price series comes from and which slice of it to use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Directory holding one `<SYMBOL>.csv` per instrument
    pub data_dir: PathBuf,
    pub date_column: String,
    pub price_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            symbol: "TSLA".to_string(),
            // first session with TSLA closing above 200
            start_date: NaiveDate::from_ymd_opt(2014, 2, 18).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2017, 9, 1).unwrap_or_default(),
            data_dir: PathBuf::from("data"),
            date_column: "date".to_string(),
            price_column: "close".to_string(),
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), PricebiasError> {
        if self.symbol.trim().is_empty() {
            return Err(PricebiasError::Configuration(
                "Symbol must not be empty".to_string()
            ));
        }
        if self.start_date >= self.end_date {
            return Err(PricebiasError::Configuration(format!(
                "Start date {} must be before end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.date_column.is_empty() || self.price_column.is_empty() {
            return Err(PricebiasError::Configuration(
                "Date and price column names must not be empty".to_string()
            ));
        }
        Ok(())
    }
}
