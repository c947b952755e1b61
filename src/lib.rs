pub mod error;
pub mod math;
pub mod data;
pub mod classifier;
pub mod constraint;
pub mod ge;
pub mod optim;

// Convenience re-exports
pub use error::{GeError, Result};
pub use math::matrix::Matrix;
pub use data::feature_vector::FeatureVector;
pub use data::instance::{Instance, InstanceList};
pub use classifier::maxent::MaxEnt;
pub use classifier::prior::GaussianPrior;
pub use classifier::scorer::LabelScorer;
pub use constraint::constraint_set::ConstraintSet;
pub use constraint::mapping::ConstraintMapping;
pub use ge::config::GeConfig;
pub use ge::evaluator::{evaluate_kl_ge, KlGeEvaluator};
pub use ge::objective::KlGeObjective;
pub use ge::stats::EvaluationStats;
pub use optim::gradient_ascent::GradientAscent;
pub use optim::optimizable::Optimizable;
