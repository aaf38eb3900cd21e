pub mod traits;
pub mod data;
pub mod evolution;
pub mod forecast;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use data::DataConfig;
pub use evolution::EvolutionConfig;
pub use forecast::ForecastConfig;
pub use traits::ConfigSection;
