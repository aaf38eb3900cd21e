pub mod forecast_runner;

pub use forecast_runner::{ForecastRun, ForecastRunner};
