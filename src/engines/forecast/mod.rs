pub mod trend;

pub use trend::{Forecast, LinearTrend, TrendForecaster, FORECAST_HORIZON, TRADING_DAYS_PER_YEAR};
