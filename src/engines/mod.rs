pub mod evaluation;
pub mod forecast;
pub mod generation;
pub mod metrics;
