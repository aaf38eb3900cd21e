//! Linear trend fitting and extrapolation
//!
//! Fits an ordinary least squares line with intercept to a sequence of
//! values indexed `1..=n` and projects it over future offsets.

use crate::error::{PricebiasError, Result};
use serde::{Deserialize, Serialize};

pub const TRADING_DAYS_PER_YEAR: usize = 251;
/// Two trading years.
pub const FORECAST_HORIZON: usize = 2 * TRADING_DAYS_PER_YEAR;

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
    /// Coefficient of determination on the fitted points
    pub r_squared: f64,
}

impl LinearTrend {
    /// Fit against `x = 1..=n`.
    ///
    /// # Errors
    /// `InsufficientData` when fewer than two values are given.
    pub fn fit(values: &[f64]) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(PricebiasError::InsufficientData(format!(
                "trend fit needs at least 2 points, got {}",
                n
            )));
        }

        let n_f = n as f64;
        let x_mean = (n_f + 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n_f;

        let (sxy, sxx) = values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
                let dx = (i + 1) as f64 - x_mean;
                (sxy + dx * (y - y_mean), sxx + dx * dx)
            });

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let ss_tot: f64 = values.iter().map(|&y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = values
            .iter()
            .enumerate()
            .map(|(i, &y)| (y - (intercept + slope * (i + 1) as f64)).powi(2))
            .sum();
        // A flat response is fitted exactly by a flat line.
        let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

        Ok(Self {
            intercept,
            slope,
            r_squared,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Predictions for `x = start, start+1, ..` (`count` values).
    pub fn extrapolate(&self, start: usize, count: usize) -> Vec<f64> {
        (start..start + count).map(|x| self.predict(x as f64)).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub trend: LinearTrend,
    pub values: Vec<f64>,
}

/// Fits a trend to a rule's matched prices and projects it forward.
#[derive(Debug, Clone, Copy)]
pub struct TrendForecaster {
    horizon: usize,
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self {
            horizon: FORECAST_HORIZON,
        }
    }
}

impl TrendForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Extrapolates over `x = n ..= n + horizon - 1`, starting at the last
    /// fitted index.
    pub fn forecast(&self, matched: &[f64]) -> Result<Forecast> {
        let trend = LinearTrend::fit(matched)?;
        let values = trend.extrapolate(matched.len(), self.horizon);

        log::info!(
            "Fitted trend on {} points: intercept {:.4}, slope {:.6}, R² {:.4}",
            matched.len(),
            trend.intercept,
            trend.slope,
            trend.r_squared
        );

        Ok(Forecast { trend, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_two_points() {
        let trend = LinearTrend::fit(&[5.0, 7.0]).unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 3.0).abs() < 1e-12);
        assert!((trend.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_rejects_short_input() {
        assert!(matches!(
            LinearTrend::fit(&[1.0]),
            Err(PricebiasError::InsufficientData(_))
        ));
        assert!(matches!(
            LinearTrend::fit(&[]),
            Err(PricebiasError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_fit_noisy_line() {
        let values = [2.5, 3.5, 6.5, 7.5];
        let trend = LinearTrend::fit(&values).unwrap();
        assert!((trend.slope - 1.8).abs() < 1e-12);
        assert!((trend.intercept - 0.5).abs() < 1e-12);
        assert!(trend.r_squared > 0.0 && trend.r_squared < 1.0);
    }

    #[test]
    fn test_flat_values() {
        let trend = LinearTrend::fit(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(trend.slope, 0.0);
        assert_eq!(trend.intercept, 4.0);
        assert_eq!(trend.r_squared, 1.0);
    }

    #[test]
    fn test_forecast_length_and_start() {
        let forecast = TrendForecaster::new().forecast(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(forecast.values.len(), FORECAST_HORIZON);
        // first prediction is at x = n, the last observed index
        assert!((forecast.values[0] - 3.0).abs() < 1e-9);
        assert!((forecast.values[501] - 504.0).abs() < 1e-9);
    }
}
