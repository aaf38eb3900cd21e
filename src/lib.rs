pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod services;
pub mod types;

pub use error::{PricebiasError, Result};
pub use types::{MatchTable, PriceSeries, Ranking, Rule, RunSummary};
