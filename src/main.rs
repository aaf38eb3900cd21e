mod cli;

use anyhow::Context;
use pricebias::config::ConfigManager;
use pricebias::data::CsvConnector;
use pricebias::engines::generation::{ConsoleProgressCallback, NUM_GENERATIONS};
use pricebias::services::ForecastRunner;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    let mut manager = ConfigManager::load(args.config.as_deref())
        .context("loading configuration")?;
    manager.update(|config| {
        if let Some(seed) = args.seed {
            config.evolution.seed = Some(seed);
        }
        if let Some(output) = args.output {
            config.forecast.output_path = output;
        }
    })?;
    let config = manager.into_inner();

    let provider = CsvConnector::from_config(&config.data);
    let runner = ForecastRunner::new(config);
    let run = runner
        .run_and_write(&provider, ConsoleProgressCallback::new(NUM_GENERATIONS))
        .with_context(|| format!("forecasting {}", runner.config().data.symbol))?;

    println!(
        "Best rule #{} (fitness {:.4}, {} matches); wrote {} predictions to {}",
        run.summary.best_rule_index,
        run.summary.best_fitness,
        run.summary.num_matches,
        run.summary.forecast_len,
        runner.config().forecast.output_path.display()
    );

    Ok(())
}
