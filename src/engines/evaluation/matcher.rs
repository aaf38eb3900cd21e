use crate::types::{MatchTable, PriceSeries, Rule};

/// Scans a price series with threshold rules.
///
/// Only interior days are matchable: day `t` needs both `t-1` and `t+1`, so
/// the first and last day of the series never appear in a match set.
pub struct RuleMatcher;

impl RuleMatcher {
    /// Middle-day prices of every window the rule accepts, in time order.
    pub fn match_rule(rule: &Rule, series: &PriceSeries) -> Vec<f64> {
        series
            .as_slice()
            .windows(3)
            .filter(|w| rule.matches(w[0], w[1], w[2]))
            .map(|w| w[1])
            .collect()
    }

    /// One entry per population slot; unmatched rules get an empty entry.
    pub fn match_population(population: &[Rule], series: &PriceSeries) -> MatchTable {
        let matches = population
            .iter()
            .map(|rule| Self::match_rule(rule, series))
            .collect();

        MatchTable::from_matches(matches)
    }
}
