pub mod fitness;

pub use fitness::{std_dev, FitnessScorer, MATCH_COUNT_PENALTY};
