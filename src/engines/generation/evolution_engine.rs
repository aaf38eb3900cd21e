use crate::config::EvolutionConfig;
use crate::engines::evaluation::RuleMatcher;
use crate::engines::generation::operators::{random_population, shift_mutation};
use crate::engines::metrics::{std_dev, FitnessScorer};
use crate::error::{PricebiasError, Result};
use crate::types::{MatchTable, PriceSeries, Ranking, Rule};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const POPULATION_SIZE: usize = 100;
pub const NUM_GENERATIONS: usize = 10;
pub const RULES_REPLACED_PER_GENERATION: usize = 2;
pub const SHIFT_STEP: f64 = 2.0;

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: Option<f64>, scored_rules: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: Option<f64>, scored_rules: usize) {
        (**self).on_generation_complete(generation, best_fitness, scored_rules);
    }
}

/// Run state handed from one phase to the next.
///
/// Rule identity is the slot index in `population`; replacement overwrites
/// slots in place and the population is never resized.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub series: PriceSeries,
    pub population: Vec<Rule>,
    pub scorer: FitnessScorer,
}

/// Output of one matching + scoring + replacement cycle.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Population exactly as it was scanned, before replacement.
    pub matched_rules: Vec<Rule>,
    pub match_table: MatchTable,
    pub ranking: Ranking,
    pub replaced: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Context after the final generation's replacement.
    pub context: RunContext,
    /// Rules as scanned by the last matching pass; `match_table` and
    /// `ranking` refer to these.
    pub matched_rules: Vec<Rule>,
    pub match_table: MatchTable,
    pub ranking: Ranking,
}

impl EvolutionOutcome {
    /// Highest-fitness rule: slot index, rule and score.
    pub fn best_rule(&self) -> Option<(usize, &Rule, f64)> {
        let best = self.ranking.best()?;
        let rule = self.matched_rules.get(best.rule_index)?;
        Some((best.rule_index, rule, best.fitness))
    }

    /// Matched prices of the highest-fitness rule.
    pub fn best_matches(&self) -> Result<&[f64]> {
        let best = self.ranking.best().ok_or_else(|| {
            PricebiasError::InsufficientData("no rule received a fitness score".to_string())
        })?;
        Ok(self.match_table.get(best.rule_index))
    }
}

/// Random population over the series' price range plus the series-wide
/// standard deviation used to normalize fitness for the whole run.
pub fn initialize<R: Rng>(series: PriceSeries, rng: &mut R) -> RunContext {
    let population = random_population(POPULATION_SIZE, &series, rng);
    let scorer = FitnessScorer::new(std_dev(series.as_slice()));

    RunContext {
        series,
        population,
        scorer,
    }
}

pub fn match_phase(context: &RunContext) -> MatchTable {
    RuleMatcher::match_population(&context.population, &context.series)
}

pub fn score_phase(context: &RunContext, match_table: &MatchTable) -> Ranking {
    context.scorer.rank(match_table)
}

/// Shifts the weakest ranked rules. With fewer than two scored rules only
/// those present are replaced, and an empty ranking replaces nothing.
pub fn replace_phase(mut context: RunContext, ranking: &Ranking) -> (RunContext, Vec<usize>) {
    let weakest = ranking.weakest(RULES_REPLACED_PER_GENERATION);
    if weakest.len() < RULES_REPLACED_PER_GENERATION {
        log::warn!(
            "only {} scored rules, replacing {} instead of {}",
            ranking.len(),
            weakest.len(),
            RULES_REPLACED_PER_GENERATION
        );
    }

    shift_mutation(&mut context.population, &weakest, SHIFT_STEP);
    (context, weakest)
}

pub fn run_generation(context: RunContext) -> (RunContext, GenerationReport) {
    let match_table = match_phase(&context);
    let ranking = score_phase(&context, &match_table);
    let matched_rules = context.population.clone();
    let (context, replaced) = replace_phase(context, &ranking);

    let report = GenerationReport {
        matched_rules,
        match_table,
        ranking,
        replaced,
    };
    (context, report)
}

fn observed_generation<C: ProgressCallback>(
    context: RunContext,
    generation: usize,
    callback: &mut C,
) -> (RunContext, GenerationReport) {
    callback.on_generation_start(generation);

    let (context, report) = run_generation(context);

    callback.on_generation_complete(
        generation,
        report.ranking.best().map(|entry| entry.fitness),
        report.ranking.len(),
    );
    log::debug!("generation {} replaced slots {:?}", generation + 1, report.replaced);

    (context, report)
}

/// Runs `generations` full cycles (at least one) and returns the last
/// matching pass together with its ranking.
pub fn evolve<C: ProgressCallback>(
    context: RunContext,
    generations: usize,
    callback: &mut C,
) -> EvolutionOutcome {
    let (mut context, mut last) = observed_generation(context, 0, callback);

    for generation in 1..generations {
        let (next, report) = observed_generation(context, generation, callback);
        context = next;
        last = report;
    }

    // Final ranking is rescored from the last match table, not re-matched.
    let ranking = score_phase(&context, &last.match_table);

    EvolutionOutcome {
        context,
        matched_rules: last.matched_rules,
        match_table: last.match_table,
        ranking,
    }
}

pub struct EvolutionEngine {
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: &EvolutionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { rng }
    }

    /// Run the full search
    pub fn run<C: ProgressCallback>(&mut self, series: PriceSeries, mut callback: C) -> EvolutionOutcome {
        let context = initialize(series, &mut self.rng);
        log::info!(
            "Initialized {} rules over {} prices (std {:.4})",
            context.population.len(),
            context.series.len(),
            context.scorer.baseline_std()
        );

        evolve(context, NUM_GENERATIONS, &mut callback)
    }
}
