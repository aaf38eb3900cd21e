use super::traits::ConfigSection;
use crate::error::PricebiasError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Newline-delimited forecast values, overwritten on every run
    pub output_path: PathBuf,
    /// Optional JSON run summary
    pub summary_path: Option<PathBuf>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("forecast.csv"),
            summary_path: None,
        }
    }
}

impl ConfigSection for ForecastConfig {
    fn section_name() -> &'static str {
        "forecast"
    }

    fn validate(&self) -> Result<(), PricebiasError> {
        if self.output_path.as_os_str().is_empty() {
            return Err(PricebiasError::Configuration(
                "Forecast output path must not be empty".to_string()
            ));
        }
        if self.summary_path.as_ref().is_some_and(|p| *p == self.output_path) {
            return Err(PricebiasError::Configuration(
                "Summary path must differ from the forecast output path".to_string()
            ));
        }
        Ok(())
    }
}
