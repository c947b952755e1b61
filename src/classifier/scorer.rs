use crate::data::feature_vector::FeatureVector;

/// Produces a temperature-scaled label distribution for one instance from the
/// classifier's current parameters.
///
/// Implementations lay their parameters out as `num_labels` rows of
/// `num_features + 1` cells, the last column being the default (bias)
/// feature. Gradients computed against a scorer use the same layout.
pub trait LabelScorer {
    fn num_labels(&self) -> usize;

    /// Size of the data alphabet, excluding the default feature.
    fn num_features(&self) -> usize;

    fn default_feature_index(&self) -> usize {
        self.num_features()
    }

    /// Parameter version stamp. Changes on every parameter write and is
    /// never reused for a different parameter state.
    fn version(&self) -> u64;

    /// Writes `softmax(w · x / temperature)` into `scores`.
    ///
    /// `scores.len()` must equal `num_labels()`. The result is not checked
    /// for finiteness here.
    fn score_with_temperature(&self, features: &FeatureVector, temperature: f64, scores: &mut [f64]);
}
