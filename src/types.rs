use crate::error::{PricebiasError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Daily closing prices, oldest first.
///
/// Construction guarantees at least three finite values so that every series
/// has at least one interior day to match against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriceSeriesData")]
pub struct PriceSeries {
    prices: Vec<f64>,
}

/// Wire form of [`PriceSeries`]; deserialization goes through
/// `PriceSeries::new` so the length and finiteness checks still apply.
#[derive(Deserialize)]
struct PriceSeriesData {
    prices: Vec<f64>,
}

impl TryFrom<PriceSeriesData> for PriceSeries {
    type Error = PricebiasError;

    fn try_from(data: PriceSeriesData) -> Result<Self> {
        Self::new(data.prices)
    }
}

impl PriceSeries {
    pub const MIN_LEN: usize = 3;

    pub fn new(prices: Vec<f64>) -> Result<Self> {
        if prices.len() < Self::MIN_LEN {
            return Err(PricebiasError::DataUnavailable(format!(
                "price series has {} points, minimum {} required",
                prices.len(),
                Self::MIN_LEN
            )));
        }
        if let Some(i) = prices.iter().position(|p| !p.is_finite()) {
            return Err(PricebiasError::DataUnavailable(format!(
                "non-finite price {} at index {}",
                prices[i], i
            )));
        }
        Ok(Self { prices })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.prices.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    pub fn min(&self) -> f64 {
        self.prices.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of 3-day windows, i.e. interior days `1..=len-2`.
    pub fn window_count(&self) -> usize {
        self.prices.len() - 2
    }
}

impl Index<usize> for PriceSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.prices[index]
    }
}

/// Threshold rule over a 3-day window `(prev, current, next)`.
///
/// Matches when `prev >= a`, `b <= current <= c` and `d <= next <= e`.
/// The constructor swaps `b/c` and `d/e` when they arrive out of order, so
/// both intervals are always well formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RuleThresholds")]
pub struct Rule {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
}

#[derive(Deserialize)]
struct RuleThresholds {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
}

impl From<RuleThresholds> for Rule {
    fn from(t: RuleThresholds) -> Self {
        Rule::new(t.a, t.b, t.c, t.d, t.e)
    }
}

impl Rule {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64) -> Self {
        let (b, c) = if b > c { (c, b) } else { (b, c) };
        let (d, e) = if d > e { (e, d) } else { (d, e) };
        Self { a, b, c, d, e }
    }

    /// Lower bound on the previous day.
    pub fn prev_floor(&self) -> f64 {
        self.a
    }

    /// Closed interval for the matched (middle) day.
    pub fn current_band(&self) -> (f64, f64) {
        (self.b, self.c)
    }

    /// Closed interval for the following day.
    pub fn next_band(&self) -> (f64, f64) {
        (self.d, self.e)
    }

    pub fn thresholds(&self) -> [f64; 5] {
        [self.a, self.b, self.c, self.d, self.e]
    }

    pub fn matches(&self, prev: f64, current: f64, next: f64) -> bool {
        prev >= self.a
            && current >= self.b
            && current <= self.c
            && next >= self.d
            && next <= self.e
    }

    /// Copy of this rule with the next-day band moved up by `step`.
    pub fn shifted(&self, step: f64) -> Self {
        Self {
            d: self.d + step,
            e: self.e + step,
            ..*self
        }
    }
}

/// Matched middle-day prices per rule, indexed by population slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable {
    matches: Vec<Vec<f64>>,
}

impl MatchTable {
    pub fn from_matches(matches: Vec<Vec<f64>>) -> Self {
        Self { matches }
    }

    /// Matched prices for the rule at `rule_index`; empty when the rule
    /// never matched or the index is out of range.
    pub fn get(&self, rule_index: usize) -> &[f64] {
        self.matches
            .get(rule_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.matches.iter().enumerate().map(|(i, m)| (i, m.as_slice()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessEntry {
    pub rule_index: usize,
    pub fitness: f64,
}

/// Scored rules sorted ascending by fitness: weakest first, best last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<FitnessEntry>,
}

impl Ranking {
    /// Stable sort, so equal scores keep rule-index order.
    pub fn from_entries(mut entries: Vec<FitnessEntry>) -> Self {
        entries.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        Self { entries }
    }

    pub fn entries(&self) -> &[FitnessEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&FitnessEntry> {
        self.entries.last()
    }

    /// Up to `count` lowest-scored rule indices.
    pub fn weakest(&self, count: usize) -> Vec<usize> {
        self.entries
            .iter()
            .take(count)
            .map(|entry| entry.rule_index)
            .collect()
    }

    pub fn fitness_of(&self, rule_index: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.rule_index == rule_index)
            .map(|entry| entry.fitness)
    }
}

/// Serializable record of one complete run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub symbol: String,
    pub num_prices: usize,
    pub baseline_std: f64,
    pub scored_rules: usize,
    pub best_rule_index: usize,
    pub best_rule: Rule,
    pub best_fitness: f64,
    pub num_matches: usize,
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub forecast_len: usize,
}
