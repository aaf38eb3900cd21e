// src/engines/metrics/fitness.rs
use crate::types::{FitnessEntry, MatchTable, Ranking};

/// Weight of the small-sample term in the fitness score.
pub const MATCH_COUNT_PENALTY: f64 = 0.1;

/// Scores match sets by how tightly they cluster relative to the whole series.
#[derive(Debug, Clone, Copy)]
pub struct FitnessScorer {
    baseline_std: f64,
}

impl FitnessScorer {
    pub fn new(baseline_std: f64) -> Self {
        Self { baseline_std }
    }

    pub fn baseline_std(&self) -> f64 {
        self.baseline_std
    }

    /// `-log2(std / baseline_std) - 0.1 / n`, or `None` when the rule matched
    /// nothing or the dispersion ratio is zero (or undefined on a flat series).
    pub fn score(&self, matched: &[f64]) -> Option<f64> {
        if matched.is_empty() {
            return None;
        }

        let ratio = std_dev(matched) / self.baseline_std;
        if ratio == 0.0 || !ratio.is_finite() {
            return None;
        }

        Some(-ratio.log2() - MATCH_COUNT_PENALTY / matched.len() as f64)
    }

    pub fn rank(&self, table: &MatchTable) -> Ranking {
        let mut entries = Vec::new();
        let mut degenerate = 0;

        for (rule_index, matched) in table.iter() {
            match self.score(matched) {
                Some(fitness) => entries.push(FitnessEntry { rule_index, fitness }),
                None if !matched.is_empty() => degenerate += 1,
                None => {}
            }
        }

        if degenerate > 0 {
            log::debug!("{} rules excluded with degenerate dispersion", degenerate);
        }

        Ranking::from_entries(entries)
    }
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter()
        .map(|&v| (v - mean).powi(2))
        .sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev_is_population() {
        // mean 5, squared deviations sum to 32 over 8 values
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_score_formula() {
        let scorer = FitnessScorer::new(2.0);
        // std of [1, 3] is 1, ratio 0.5, -log2(0.5) = 1
        let fitness = scorer.score(&[1.0, 3.0]).unwrap();
        assert!((fitness - (1.0 - 0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_flat_matches_are_unscored() {
        let scorer = FitnessScorer::new(2.0);
        assert_eq!(scorer.score(&[]), None);
        assert_eq!(scorer.score(&[4.0]), None);
        assert_eq!(scorer.score(&[4.0, 4.0, 4.0]), None);
    }

    #[test]
    fn test_flat_series_scores_nothing() {
        let scorer = FitnessScorer::new(0.0);
        assert_eq!(scorer.score(&[4.0, 4.0]), None);
    }

    #[test]
    fn test_rank_orders_ascending() {
        let scorer = FitnessScorer::new(4.0);
        let table = MatchTable::from_matches(vec![
            vec![0.0, 8.0],       // ratio 1.0
            vec![],               // unmatched
            vec![3.0, 5.0],       // ratio 0.25
            vec![7.0, 7.0],       // flat
            vec![2.0, 6.0],       // ratio 0.5
        ]);

        let ranking = scorer.rank(&table);
        let order: Vec<usize> = ranking.entries().iter().map(|e| e.rule_index).collect();
        assert_eq!(order, vec![0, 4, 2]);

        let scores: Vec<f64> = ranking.entries().iter().map(|e| e.fitness).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ranking.weakest(2), vec![0, 4]);
    }
}
