use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

use crate::error::{GeError, Result};

/// Reference label distributions keyed by feature index.
///
/// The classifier's default feature index may appear as a key; its reference
/// then constrains the overall label marginal. Distributions are expected to
/// sum to one but this is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    references: BTreeMap<usize, Vec<f64>>,
}

impl ConstraintSet {
    pub fn new() -> ConstraintSet {
        ConstraintSet::default()
    }

    /// Adds or replaces the reference distribution for `feature`.
    pub fn insert(&mut self, feature: usize, reference: Vec<f64>) -> Option<Vec<f64>> {
        self.references.insert(feature, reference)
    }

    pub fn with(mut self, feature: usize, reference: Vec<f64>) -> ConstraintSet {
        self.insert(feature, reference);
        self
    }

    pub fn get(&self, feature: usize) -> Option<&[f64]> {
        self.references.get(&feature).map(Vec::as_slice)
    }

    pub fn contains(&self, feature: usize) -> bool {
        self.references.contains_key(&feature)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Constrained features in ascending index order.
    pub fn features(&self) -> impl Iterator<Item = usize> + '_ {
        self.references.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> + '_ {
        self.references.iter().map(|(&f, r)| (f, r.as_slice()))
    }

    /// Checks every reference has one finite, non-negative weight per label.
    pub fn validate(&self, num_labels: usize) -> Result<()> {
        for (feature, reference) in self.iter() {
            if reference.len() != num_labels {
                return Err(GeError::ReferenceLength {
                    feature,
                    expected: num_labels,
                    found: reference.len(),
                });
            }
            if reference.iter().any(|r| !r.is_finite() || *r < 0.0) {
                return Err(GeError::InvalidReference { feature });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_length_and_sign() {
        let ok = ConstraintSet::new().with(0, vec![0.7, 0.3]);
        assert!(ok.validate(2).is_ok());
        assert!(matches!(
            ok.validate(3),
            Err(GeError::ReferenceLength { feature: 0, expected: 3, found: 2 })
        ));
        let negative = ConstraintSet::new().with(4, vec![1.5, -0.5]);
        assert!(matches!(negative.validate(2), Err(GeError::InvalidReference { feature: 4 })));
    }

    #[test]
    fn serializes_as_plain_map() {
        let set = ConstraintSet::new().with(3, vec![0.5, 0.5]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"3":[0.5,0.5]}"#);
        let back: ConstraintSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
