use super::evolution_engine::ProgressCallback;

/// Reports generation progress through the `log` facade.
pub struct ConsoleProgressCallback {
    total_generations: usize,
}

impl ConsoleProgressCallback {
    pub fn new(total_generations: usize) -> Self {
        Self { total_generations }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {}/{} starting...", generation + 1, self.total_generations);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: Option<f64>, scored_rules: usize) {
        match best_fitness {
            Some(best) => log::info!(
                "Generation {}/{} complete. Best fitness: {:.4}, scored rules: {}",
                generation + 1, self.total_generations, best, scored_rules
            ),
            None => log::info!(
                "Generation {}/{} complete. No rule scored",
                generation + 1, self.total_generations
            ),
        }
    }
}
