pub mod constraint_set;
pub mod mapping;

pub use constraint_set::ConstraintSet;
pub use mapping::ConstraintMapping;
