use crate::types::{PriceSeries, Rule};
use rand::Rng;
use std::ops::RangeInclusive;

/// Integer range spanning the series: `floor(min)..=ceil(max)`.
pub fn price_range(series: &PriceSeries) -> RangeInclusive<i64> {
    let low = series.min().floor() as i64;
    let high = series.max().ceil() as i64;
    low..=high
}

/// Rule with all five thresholds drawn uniformly from `range`.
pub fn random_rule<R: Rng>(range: RangeInclusive<i64>, rng: &mut R) -> Rule {
    let mut draw = || rng.gen_range(range.clone()) as f64;
    let a = draw();
    let b = draw();
    let c = draw();
    let d = draw();
    let e = draw();
    Rule::new(a, b, c, d, e)
}

pub fn random_population<R: Rng>(
    size: usize,
    series: &PriceSeries,
    rng: &mut R,
) -> Vec<Rule> {
    let range = price_range(series);
    (0..size)
        .map(|_| random_rule(range.clone(), rng))
        .collect()
}

/// Shift mutation: overwrite each selected slot with its rule's next-day
/// band moved up by `step`. Slots keep their index.
pub fn shift_mutation(population: &mut [Rule], indices: &[usize], step: f64) {
    for &index in indices {
        if let Some(rule) = population.get_mut(index) {
            *rule = rule.shifted(step);
        }
    }
}
