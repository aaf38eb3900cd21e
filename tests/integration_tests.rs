use chrono::{Duration, NaiveDate};
use pricebias::config::AppConfig;
use pricebias::data::{CsvConnector, InMemoryProvider, PriceProvider};
use pricebias::engines::forecast::FORECAST_HORIZON;
use pricebias::engines::generation::ProgressCallback;
use pricebias::error::PricebiasError;
use pricebias::services::ForecastRunner;
use pricebias::types::RunSummary;
use std::path::{Path, PathBuf};

struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best: Option<f64>, _scored: usize) {}
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 1, 4).unwrap()
}

fn dated_closes(days: usize) -> Vec<(NaiveDate, f64)> {
    (0..days)
        .map(|i| {
            let t = i as f64;
            let close = 230.0 + 0.1 * t + 18.0 * (t / 13.0).sin() + 6.0 * (t / 4.0).cos();
            (start() + Duration::days(i as i64), (close * 100.0).round() / 100.0)
        })
        .collect()
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pricebias_it_{}_{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_config(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.data.symbol = "TEST".to_string();
    config.data.start_date = start();
    config.data.end_date = start() + Duration::days(400);
    config.data.data_dir = dir.to_path_buf();
    config.evolution.seed = Some(42);
    config.forecast.output_path = dir.join("forecast.csv");
    config.forecast.summary_path = Some(dir.join("summary.json"));
    config
}

#[test]
fn test_end_to_end_in_memory() {
    let dir = temp_dir("memory");
    let config = test_config(&dir);
    let provider = InMemoryProvider::new().with_prices("TEST", dated_closes(400));

    let runner = ForecastRunner::new(config.clone());
    let run = runner.run_and_write(&provider, NoProgress).unwrap();

    assert_eq!(run.summary.num_prices, 400);
    assert_eq!(run.summary.forecast_len, FORECAST_HORIZON);
    assert!(run.summary.num_matches >= 2);
    assert_eq!(run.summary.scored_rules, run.outcome.ranking.len());

    let written = std::fs::read_to_string(&config.forecast.output_path).unwrap();
    let lines: Vec<f64> = written.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(lines, run.forecast.values);

    let summary: RunSummary =
        serde_json::from_str(&std::fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary.best_rule_index, run.summary.best_rule_index);
    assert_eq!(summary.best_rule, run.summary.best_rule);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_same_seed_same_forecast() {
    let dir = temp_dir("seeded");
    let config = test_config(&dir);
    let provider = InMemoryProvider::new().with_prices("TEST", dated_closes(300));

    let first = ForecastRunner::new(config.clone()).run(&provider, NoProgress).unwrap();
    let second = ForecastRunner::new(config).run(&provider, NoProgress).unwrap();

    assert_eq!(first.forecast.values, second.forecast.values);
    assert_eq!(first.summary.best_rule, second.summary.best_rule);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_csv_connector_feeds_runner() {
    let dir = temp_dir("csv");
    let mut csv = String::from("date,open,close\n");
    for (date, close) in dated_closes(250) {
        csv.push_str(&format!("{},{},{}\n", date.format("%Y-%m-%d"), close - 1.0, close));
    }
    std::fs::write(dir.join("TEST.csv"), csv).unwrap();

    let config = test_config(&dir);
    let connector = CsvConnector::from_config(&config.data);

    let series = connector
        .fetch("TEST", start(), start() + Duration::days(99))
        .unwrap();
    assert_eq!(series.len(), 100);
    assert_eq!(series[0], dated_closes(1)[0].1);

    let run = ForecastRunner::new(config).run_and_write(&connector, NoProgress).unwrap();
    assert_eq!(run.summary.num_prices, 250);
    assert!(dir.join("forecast.csv").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_short_series_fails_at_load() {
    let dir = temp_dir("short");
    let config = test_config(&dir);
    let provider = InMemoryProvider::new().with_prices("TEST", dated_closes(2));

    let result = ForecastRunner::new(config.clone()).run_and_write(&provider, NoProgress);
    assert!(matches!(result, Err(PricebiasError::DataUnavailable(_))));
    assert!(!config.forecast.output_path.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_flat_series_has_no_scored_rule() {
    let dir = temp_dir("flat");
    let config = test_config(&dir);
    let flat = (0..50)
        .map(|i| (start() + Duration::days(i), 250.0))
        .collect();
    let provider = InMemoryProvider::new().with_prices("TEST", flat);

    let result = ForecastRunner::new(config).run(&provider, NoProgress);
    assert!(matches!(result, Err(PricebiasError::InsufficientData(_))));

    std::fs::remove_dir_all(&dir).ok();
}
