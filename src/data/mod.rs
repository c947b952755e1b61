pub mod feature_vector;
pub mod instance;

pub use feature_vector::FeatureVector;
pub use instance::{Instance, InstanceList};
