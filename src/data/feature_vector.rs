use serde::{Serialize, Deserialize};
use std::collections::HashSet;

use crate::error::{GeError, Result};

/// Sparse feature vector: parallel arrays of feature indices and values.
///
/// Only present entries are stored. Indices are unique; their order carries
/// no meaning but is preserved so callers can iterate by location.
/// Serialized as a list of `[index, value]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(usize, f64)>", into = "Vec<(usize, f64)>")]
pub struct FeatureVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Builds a vector from `(index, value)` pairs, rejecting repeated indices.
    pub fn from_pairs(pairs: Vec<(usize, f64)>) -> Result<FeatureVector> {
        let mut seen = HashSet::with_capacity(pairs.len());
        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            if !seen.insert(index) {
                return Err(GeError::DuplicateFeature { index });
            }
            indices.push(index);
            values.push(value);
        }
        Ok(FeatureVector { indices, values })
    }

    /// Binary vector: every listed feature fires with value 1.
    pub fn binary(indices: Vec<usize>) -> Result<FeatureVector> {
        FeatureVector::from_pairs(indices.into_iter().map(|i| (i, 1.0)).collect())
    }

    pub fn num_locations(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn index_at_location(&self, loc: usize) -> usize {
        self.indices[loc]
    }

    pub fn value_at_location(&self, loc: usize) -> f64 {
        self.values[loc]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Largest stored index, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }

    /// Sparse dot product against one dense parameter row.
    pub fn dot(&self, row: &[f64]) -> f64 {
        self.iter().map(|(i, v)| row[i] * v).sum()
    }
}

impl TryFrom<Vec<(usize, f64)>> for FeatureVector {
    type Error = GeError;

    fn try_from(pairs: Vec<(usize, f64)>) -> Result<FeatureVector> {
        FeatureVector::from_pairs(pairs)
    }
}

impl From<FeatureVector> for Vec<(usize, f64)> {
    fn from(fv: FeatureVector) -> Vec<(usize, f64)> {
        fv.indices.into_iter().zip(fv.values).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_indices_are_rejected() {
        let err = FeatureVector::from_pairs(vec![(1, 1.0), (1, 2.0)]).unwrap_err();
        assert!(matches!(err, GeError::DuplicateFeature { index: 1 }));
    }

    #[test]
    fn positional_access_follows_insertion_order() {
        let fv = FeatureVector::from_pairs(vec![(5, 0.5), (2, 3.0)]).unwrap();
        assert_eq!(fv.num_locations(), 2);
        assert_eq!(fv.index_at_location(0), 5);
        assert_eq!(fv.value_at_location(1), 3.0);
        assert_eq!(fv.max_index(), Some(5));
    }

    #[test]
    fn dot_uses_only_stored_entries() {
        let fv = FeatureVector::binary(vec![0, 2]).unwrap();
        assert_eq!(fv.dot(&[1.0, 10.0, 3.0]), 4.0);
    }

    #[test]
    fn deserialization_rejects_duplicate_indices() {
        let err = serde_json::from_str::<FeatureVector>("[[0, 1.0], [0, 1.0]]").unwrap_err();
        assert!(err.to_string().contains("Feature index 0 appears more than once"));
        let fv: FeatureVector = serde_json::from_str("[[3, 0.5], [1, 2.0]]").unwrap();
        assert_eq!(fv, FeatureVector::from_pairs(vec![(3, 0.5), (1, 2.0)]).unwrap());
        assert_eq!(serde_json::to_string(&fv).unwrap(), "[[3,0.5],[1,2.0]]");
    }
}
