pub mod config;
pub mod divergence;
pub mod evaluator;
pub mod expectation;
pub mod gradient;
pub mod objective;
pub mod stats;

pub use config::GeConfig;
pub use evaluator::{evaluate_kl_ge, EvaluationCache, KlGeEvaluator, PassSummary};
pub use objective::KlGeObjective;
pub use stats::EvaluationStats;
