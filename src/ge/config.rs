use serde::{Serialize, Deserialize};

use crate::constraint::constraint_set::ConstraintSet;
use crate::error::{GeError, Result};

/// Settings for one KL-divergence GE criterion.
///
/// # Fields
/// - `constraints`:           reference label distribution per constrained feature
/// - `objective_weight`:      scales the whole penalty; `0.0` disables it,
///                             negative weights are rejected
/// - `temperature`:           softmax temperature used for scoring and in the
///                             gradient's chain-rule factor
/// - `use_values`:            when `false` every firing feature counts as 1
/// - `default_feature_index`: the always-on bias feature of the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeConfig {
    pub constraints: ConstraintSet,
    #[serde(default = "unit")]
    pub objective_weight: f64,
    #[serde(default = "unit")]
    pub temperature: f64,
    #[serde(default = "enabled")]
    pub use_values: bool,
    pub default_feature_index: usize,
}

fn unit() -> f64 {
    1.0
}

fn enabled() -> bool {
    true
}

impl GeConfig {
    /// Weight 1, temperature 1, feature values used as stored.
    pub fn new(constraints: ConstraintSet, default_feature_index: usize) -> GeConfig {
        GeConfig {
            constraints,
            objective_weight: 1.0,
            temperature: 1.0,
            use_values: true,
            default_feature_index,
        }
    }

    pub fn with_objective_weight(mut self, objective_weight: f64) -> GeConfig {
        self.objective_weight = objective_weight;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> GeConfig {
        self.temperature = temperature;
        self
    }

    pub fn with_use_values(mut self, use_values: bool) -> GeConfig {
        self.use_values = use_values;
        self
    }

    /// Checks the scalar settings. Reference distributions are checked
    /// against the label count at evaluation time.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(GeError::InvalidTemperature(self.temperature));
        }
        if !self.objective_weight.is_finite() || self.objective_weight < 0.0 {
            return Err(GeError::InvalidWeight(self.objective_weight));
        }
        Ok(())
    }

    /// Serializes the configuration to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a configuration from a JSON file.
    pub fn load_json(path: &str) -> Result<GeConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: GeConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
