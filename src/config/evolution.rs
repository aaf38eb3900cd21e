use super::traits::ConfigSection;
use crate::error::PricebiasError;
use serde::{Deserialize, Serialize};

/// Population size, generation count and rule shape are fixed; only the
/// random source is configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), PricebiasError> {
        Ok(())
    }
}
