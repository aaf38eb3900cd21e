use super::{
    data::DataConfig,
    evolution::EvolutionConfig,
    forecast::ForecastConfig,
    traits::ConfigSection,
};
use crate::error::PricebiasError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment overrides look like `PRICEBIAS_DATA__SYMBOL=AAPL`.
pub const ENV_PREFIX: &str = "PRICEBIAS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub evolution: EvolutionConfig,
    pub forecast: ForecastConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PricebiasError> {
        self.data.validate()?;
        self.evolution.validate()?;
        self.forecast.validate()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layered load: defaults, then the optional TOML file, then
    /// `PRICEBIAS_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, PricebiasError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| PricebiasError::Configuration(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(Self { config })
    }

    /// Reads a single TOML file with no environment layer, so a file written
    /// by [`save_to_file`](Self::save_to_file) reloads exactly as saved.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PricebiasError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PricebiasError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| PricebiasError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        self.config = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PricebiasError> {
        let toml_str = toml::to_string_pretty(&self.config)
            .map_err(|e| PricebiasError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| PricebiasError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_inner(self) -> AppConfig {
        self.config
    }

    /// Applies `f` and keeps the result only if it validates.
    pub fn update<F>(&mut self, f: F) -> Result<(), PricebiasError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Tests that read PRICEBIAS_* variables hold this while they run.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pricebias_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.symbol, "TSLA");
        assert_eq!(config.evolution.seed, None);
    }

    #[test]
    fn test_load_from_file_partial_sections() {
        let path = temp_path("partial.toml");
        std::fs::write(
            &path,
            "[data]\nsymbol = \"AAPL\"\nstart_date = \"2020-01-02\"\nend_date = \"2021-06-30\"\n\n[evolution]\nseed = 42\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get();

        assert_eq!(config.data.symbol, "AAPL");
        assert_eq!(config.data.start_date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(config.data.end_date, NaiveDate::from_ymd_opt(2021, 6, 30).unwrap());
        assert_eq!(config.data.price_column, "close");
        assert_eq!(config.evolution.seed, Some(42));
        assert_eq!(config.forecast.output_path, PathBuf::from("forecast.csv"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let path = temp_path("inverted.toml");
        std::fs::write(
            &path,
            "[data]\nstart_date = \"2018-01-01\"\nend_date = \"2017-01-01\"\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_from_file(&path);
        assert!(matches!(result, Err(PricebiasError::Configuration(_))));
        assert_eq!(manager.get().data.symbol, "TSLA");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_layered_load_reads_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = temp_path("layered.toml");
        std::fs::write(&path, "[forecast]\noutput_path = \"out/predictions.csv\"\n").unwrap();

        let manager = ConfigManager::load(Some(path.as_path())).unwrap();
        assert_eq!(
            manager.get().forecast.output_path,
            PathBuf::from("out/predictions.csv")
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = temp_path("env_layer.toml");
        std::fs::write(&path, "[data]\nsymbol = \"MSFT\"\n").unwrap();

        std::env::set_var("PRICEBIAS_DATA__SYMBOL", "AAPL");
        std::env::set_var("PRICEBIAS_EVOLUTION__SEED", "42");

        let layered = ConfigManager::load(Some(path.as_path()));
        let mut file_only = ConfigManager::new();
        let file_result = file_only.load_from_file(&path);

        std::env::remove_var("PRICEBIAS_DATA__SYMBOL");
        std::env::remove_var("PRICEBIAS_EVOLUTION__SEED");
        std::fs::remove_file(&path).ok();

        let layered = layered.unwrap();
        assert_eq!(layered.get().data.symbol, "AAPL");
        assert_eq!(layered.get().evolution.seed, Some(42));
        assert_eq!(layered.get().data.price_column, "close");

        file_result.unwrap();
        assert_eq!(file_only.get().data.symbol, "MSFT");
        assert_eq!(file_only.get().evolution.seed, None);
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("saved.toml");
        let mut manager = ConfigManager::new();
        manager.update(|c| c.evolution.seed = Some(7)).unwrap();
        manager.save_to_file(&path).unwrap();

        let mut reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().evolution.seed, Some(7));
        assert_eq!(reloaded.get().data.end_date, manager.get().data.end_date);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_update_rejects_invalid_change() {
        let mut manager = ConfigManager::new();
        let result = manager.update(|c| c.data.symbol = String::new());
        assert!(result.is_err());
        assert_eq!(manager.get().data.symbol, "TSLA");
    }
}
