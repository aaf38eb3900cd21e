use crate::data::connectors::DataValidator;
use crate::error::{PricebiasError, Result};
use crate::types::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Source of daily closing prices for a named instrument.
pub trait PriceProvider {
    /// Closes for `symbol` with `start <= date <= end`, oldest first.
    ///
    /// # Errors
    /// `DataUnavailable` when `start >= end`, the symbol is unknown, or fewer
    /// than three prices fall inside the range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// Provider backed by dated closes held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    bars: HashMap<String, Vec<(NaiveDate, f64)>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(mut self, symbol: &str, mut bars: Vec<(NaiveDate, f64)>) -> Self {
        bars.sort_by_key(|(date, _)| *date);
        self.bars.insert(symbol.to_string(), bars);
        self
    }
}

impl PriceProvider for InMemoryProvider {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        DataValidator::validate_range(start, end)?;

        let bars = self.bars.get(symbol).ok_or_else(|| {
            PricebiasError::DataUnavailable(format!("no prices for symbol {}", symbol))
        })?;

        let closes = bars
            .iter()
            .filter(|(date, _)| *date >= start && *date <= end)
            .map(|(_, close)| *close)
            .collect();

        DataValidator::to_series(symbol, closes)
    }
}
