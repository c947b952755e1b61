use std::collections::HashMap;

use crate::constraint::constraint_set::ConstraintSet;

/// Dense `0..K` numbering of the constrained features.
///
/// The numbering follows the constraint set's key order and is stable for
/// the lifetime of the mapping.
#[derive(Debug, Clone, Default)]
pub struct ConstraintMapping {
    dense: HashMap<usize, usize>,
    features: Vec<usize>,
}

impl ConstraintMapping {
    pub fn build(constraints: &ConstraintSet) -> ConstraintMapping {
        let features: Vec<usize> = constraints.features().collect();
        let dense = features.iter().enumerate().map(|(c, &f)| (f, c)).collect();
        ConstraintMapping { dense, features }
    }

    /// Dense index of `feature`, if it is constrained.
    #[inline]
    pub fn get(&self, feature: usize) -> Option<usize> {
        self.dense.get(&feature).copied()
    }

    /// Feature index behind dense index `c`.
    pub fn feature_at(&self, c: usize) -> usize {
        self.features[c]
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
