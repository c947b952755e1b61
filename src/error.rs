use thiserror::Error;

/// Errors surfaced while building datasets, configuring the criterion or
/// evaluating it.
#[derive(Error, Debug)]
pub enum GeError {
    #[error("Failed to read or write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Scorer produced a non-finite probability for instance {instance}, label {label}")]
    NonFiniteScore { instance: usize, label: usize },
    #[error("Model probability for label {label} given feature {feature} is zero while its reference weight is positive")]
    DegenerateExpectation { feature: usize, label: usize },
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Reference distribution for feature {feature} has {found} entries, but there are {expected} labels")]
    ReferenceLength {
        feature: usize,
        expected: usize,
        found: usize,
    },
    #[error("Reference distribution for feature {feature} contains a negative or non-finite weight")]
    InvalidReference { feature: usize },
    #[error("Feature index {index} is outside the data alphabet of size {num_features}")]
    FeatureOutOfRange { index: usize, num_features: usize },
    #[error("Feature index {index} appears more than once in a feature vector")]
    DuplicateFeature { index: usize },
    #[error("Label {label} is outside the target alphabet of size {num_labels}")]
    LabelOutOfRange { label: usize, num_labels: usize },
    #[error("Temperature must be finite and strictly positive, got {0}")]
    InvalidTemperature(f64),
    #[error("Prior variance must be finite and strictly positive, got {0}")]
    InvalidVariance(f64),
    #[error("Weight must be finite and non-negative, got {0}")]
    InvalidWeight(f64),
}

pub type Result<T> = std::result::Result<T, GeError>;
