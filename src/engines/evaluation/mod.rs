pub mod matcher;

pub use matcher::RuleMatcher;
