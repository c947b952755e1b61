use rand::Rng;
use serde::{Serialize, Deserialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::classifier::scorer::LabelScorer;
use crate::data::feature_vector::FeatureVector;
use crate::data::instance::InstanceList;
use crate::error::{GeError, Result};
use crate::math::matrix::Matrix;
use crate::math::ops::softmax_with_temperature;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Version stamps are unique across all classifiers, so a clone mutated
/// independently never shares a stamp with its origin.
fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Multinomial logistic-regression classifier.
///
/// `parameters` has one row per label and `num_features + 1` columns; the
/// last column holds the default (bias) feature weight, which fires with
/// value 1 for every instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxEnt {
    num_features: usize,
    parameters: Matrix,
    #[serde(skip, default = "next_version")]
    version: u64,
}

impl MaxEnt {
    /// All-zero parameters: every instance scores uniformly.
    pub fn new(num_features: usize, num_labels: usize) -> MaxEnt {
        MaxEnt {
            num_features,
            parameters: Matrix::zeros(num_labels, num_features + 1),
            version: next_version(),
        }
    }

    /// Parameters drawn uniformly from [-scale, scale).
    pub fn random<R: Rng + ?Sized>(num_features: usize, num_labels: usize, scale: f64, rng: &mut R) -> MaxEnt {
        MaxEnt {
            num_features,
            parameters: Matrix::random(num_labels, num_features + 1, scale, rng),
            version: next_version(),
        }
    }

    /// Zero classifier sized to a training set's alphabets.
    pub fn for_instances(instances: &InstanceList) -> MaxEnt {
        MaxEnt::new(instances.num_features(), instances.num_labels())
    }

    pub fn parameters(&self) -> &Matrix {
        &self.parameters
    }

    pub fn num_parameters(&self) -> usize {
        self.parameters.data.len()
    }

    pub fn get_parameters(&self, buffer: &mut [f64]) -> Result<()> {
        if buffer.len() != self.num_parameters() {
            return Err(GeError::DimensionMismatch {
                what: "parameter buffer",
                expected: self.num_parameters(),
                found: buffer.len(),
            });
        }
        buffer.copy_from_slice(&self.parameters.data);
        Ok(())
    }

    pub fn set_parameters(&mut self, params: &[f64]) -> Result<()> {
        if params.len() != self.num_parameters() {
            return Err(GeError::DimensionMismatch {
                what: "parameter buffer",
                expected: self.num_parameters(),
                found: params.len(),
            });
        }
        self.parameters.data.copy_from_slice(params);
        self.version = next_version();
        Ok(())
    }

    pub fn get_parameter(&self, label: usize, feature: usize) -> f64 {
        self.parameters.get(label, feature)
    }

    pub fn set_parameter(&mut self, label: usize, feature: usize, value: f64) {
        self.parameters.set(label, feature, value);
        self.version = next_version();
    }

    /// `θ += factor * direction`, the update every first-order step performs.
    pub fn add_scaled(&mut self, direction: &[f64], factor: f64) -> Result<()> {
        if direction.len() != self.num_parameters() {
            return Err(GeError::DimensionMismatch {
                what: "update direction",
                expected: self.num_parameters(),
                found: direction.len(),
            });
        }
        for (p, d) in self.parameters.data.iter_mut().zip(direction) {
            *p += factor * d;
        }
        self.version = next_version();
        Ok(())
    }

    /// Untempered label distribution.
    pub fn score(&self, features: &FeatureVector) -> Vec<f64> {
        let mut scores = vec![0.0; self.parameters.rows];
        self.score_with_temperature(features, 1.0, &mut scores);
        scores
    }

    /// Arg-max label.
    pub fn classify(&self, features: &FeatureVector) -> usize {
        self.score(features)
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Weighted mean of the tempered label distribution over the unlabeled
    /// instances, i.e. the model's label marginal on the unlabeled data.
    pub fn mean_distribution(&self, instances: &InstanceList, temperature: f64) -> Vec<f64> {
        let num_labels = self.parameters.rows;
        let mut mean = vec![0.0; num_labels];
        let mut scores = vec![0.0; num_labels];
        let mut total_weight = 0.0;
        for (_, inst) in instances.unlabeled() {
            self.score_with_temperature(&inst.features, temperature, &mut scores);
            for (m, s) in mean.iter_mut().zip(&scores) {
                *m += s * inst.weight;
            }
            total_weight += inst.weight;
        }
        if total_weight > 0.0 {
            mean.iter_mut().for_each(|m| *m /= total_weight);
        }
        mean
    }

    /// Serializes the classifier parameters to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a classifier from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<MaxEnt> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let model: MaxEnt = serde_json::from_reader(reader)?;
        let expected = model.parameters.rows * model.parameters.cols;
        if model.parameters.data.len() != expected {
            return Err(GeError::DimensionMismatch {
                what: "parameter buffer",
                expected,
                found: model.parameters.data.len(),
            });
        }
        if model.parameters.cols != model.num_features + 1 {
            return Err(GeError::DimensionMismatch {
                what: "parameter columns",
                expected: model.num_features + 1,
                found: model.parameters.cols,
            });
        }
        Ok(model)
    }
}

impl LabelScorer for MaxEnt {
    fn num_labels(&self) -> usize {
        self.parameters.rows
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn score_with_temperature(&self, features: &FeatureVector, temperature: f64, scores: &mut [f64]) {
        let bias = self.num_features;
        for (label, score) in scores.iter_mut().enumerate() {
            let row = self.parameters.row(label);
            *score = features.dot(row) + row[bias];
        }
        softmax_with_temperature(scores, temperature);
    }
}
