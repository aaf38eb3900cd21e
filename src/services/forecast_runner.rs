use crate::config::AppConfig;
use crate::data::{ForecastWriter, PriceProvider};
use crate::engines::forecast::{Forecast, TrendForecaster};
use crate::engines::generation::{EvolutionEngine, EvolutionOutcome, ProgressCallback};
use crate::error::{PricebiasError, Result};
use crate::types::RunSummary;

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub outcome: EvolutionOutcome,
    pub forecast: Forecast,
    pub summary: RunSummary,
}

/// Fetch, evolve, forecast, and write, in that order, failing fast at each
/// boundary.
pub struct ForecastRunner {
    config: AppConfig,
    forecaster: TrendForecaster,
}

impl ForecastRunner {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            forecaster: TrendForecaster::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs the search and forecast without touching the filesystem.
    pub fn run<P: PriceProvider, C: ProgressCallback>(
        &self,
        provider: &P,
        callback: C,
    ) -> Result<ForecastRun> {
        let data = &self.config.data;
        let series = provider.fetch(&data.symbol, data.start_date, data.end_date)?;
        let num_prices = series.len();

        let mut engine = EvolutionEngine::new(&self.config.evolution);
        let outcome = engine.run(series, callback);

        let (best_rule_index, best_rule, best_fitness) = outcome.best_rule().ok_or_else(|| {
            PricebiasError::InsufficientData("no rule received a fitness score".to_string())
        })?;
        let best_rule = *best_rule;

        let matched = outcome.best_matches()?;
        log::info!(
            "Best rule #{} {:?} fitness {:.4} with {} matches",
            best_rule_index,
            best_rule.thresholds(),
            best_fitness,
            matched.len()
        );

        let forecast = self.forecaster.forecast(matched)?;

        let summary = RunSummary {
            symbol: data.symbol.clone(),
            num_prices,
            baseline_std: outcome.context.scorer.baseline_std(),
            scored_rules: outcome.ranking.len(),
            best_rule_index,
            best_rule,
            best_fitness,
            num_matches: matched.len(),
            intercept: forecast.trend.intercept,
            slope: forecast.trend.slope,
            r_squared: forecast.trend.r_squared,
            forecast_len: forecast.values.len(),
        };

        Ok(ForecastRun {
            outcome,
            forecast,
            summary,
        })
    }

    /// Runs and writes the forecast, plus the JSON summary when configured.
    pub fn run_and_write<P: PriceProvider, C: ProgressCallback>(
        &self,
        provider: &P,
        callback: C,
    ) -> Result<ForecastRun> {
        let run = self.run(provider, callback)?;

        ForecastWriter::write(&run.forecast.values, &self.config.forecast.output_path)?;
        if let Some(summary_path) = &self.config.forecast.summary_path {
            ForecastWriter::write_json(&run.summary, summary_path)?;
            log::info!("Wrote run summary to {}", summary_path.display());
        }

        Ok(run)
    }
}
