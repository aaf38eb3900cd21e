pub mod evolution_engine;
pub mod operators;
pub mod progress;

pub use evolution_engine::{
    EvolutionEngine, EvolutionOutcome, GenerationReport, ProgressCallback, RunContext,
    NUM_GENERATIONS, POPULATION_SIZE,
};
pub use progress::ConsoleProgressCallback;
