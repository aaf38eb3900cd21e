pub mod connectors;
pub mod provider;
pub mod writer;

pub use connectors::{CsvConnector, DataValidator};
pub use provider::{InMemoryProvider, PriceProvider};
pub use writer::ForecastWriter;
