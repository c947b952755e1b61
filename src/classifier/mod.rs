pub mod maxent;
pub mod prior;
pub mod scorer;

pub use maxent::MaxEnt;
pub use prior::GaussianPrior;
pub use scorer::LabelScorer;
