use crate::classifier::scorer::LabelScorer;
use crate::constraint::mapping::ConstraintMapping;
use crate::data::instance::InstanceList;
use crate::error::{GeError, Result};
use crate::ge::config::GeConfig;
use crate::math::matrix::Matrix;

/// Result of the first pass over the unlabeled instances.
///
/// - `scores`:       tempered label distribution per instance (`len × L`);
///                    rows of labeled instances stay zero
/// - `counts`:       weighted occurrence count per constrained feature (`K`)
/// - `expectations`: weighted sum of label scores per constrained feature
///                    (`K × L`), not yet normalized
#[derive(Debug, Clone)]
pub struct Expectations {
    pub scores: Matrix,
    pub counts: Vec<f64>,
    pub expectations: Matrix,
    pub unlabeled: usize,
}

impl Expectations {
    /// Model conditional `P(label | feature c fires)`, or `None` when the
    /// feature never fired.
    pub fn conditional(&self, c: usize) -> Option<Vec<f64>> {
        let count = self.counts[c];
        if count > 0.0 {
            Some(self.expectations.row(c).iter().map(|e| e / count).collect())
        } else {
            None
        }
    }
}

/// Scores every unlabeled instance and accumulates, per constrained feature,
/// its weighted occurrence count and weighted label expectation.
///
/// The default feature, when constrained, fires once with value 1 on every
/// unlabeled instance.
pub fn accumulate<S: LabelScorer + ?Sized>(
    config: &GeConfig,
    mapping: &ConstraintMapping,
    scorer: &S,
    instances: &InstanceList,
) -> Result<Expectations> {
    let num_labels = scorer.num_labels();
    let mut scores = Matrix::zeros(instances.len(), num_labels);
    let mut counts = vec![0.0; mapping.len()];
    let mut expectations = Matrix::zeros(mapping.len(), num_labels);
    let default_c = mapping.get(config.default_feature_index);
    let mut unlabeled = 0;

    let mut row = vec![0.0; num_labels];
    for (ii, instance) in instances.unlabeled() {
        unlabeled += 1;
        let weight = instance.weight;
        let fv = &instance.features;

        scorer.score_with_temperature(fv, config.temperature, &mut row);
        if let Some(label) = row.iter().position(|s| !s.is_finite()) {
            return Err(GeError::NonFiniteScore { instance: ii, label });
        }

        for (index, value) in fv.iter() {
            if let Some(c) = mapping.get(index) {
                let val = if config.use_values { value } else { 1.0 };
                counts[c] += val * weight;
                for (l, s) in row.iter().enumerate() {
                    expectations.data[c * num_labels + l] += s * val * weight;
                }
            }
        }

        if let Some(c) = default_c {
            counts[c] += weight;
            for (l, s) in row.iter().enumerate() {
                expectations.data[c * num_labels + l] += s * weight;
            }
        }

        scores.data[ii * num_labels..(ii + 1) * num_labels].copy_from_slice(&row);
    }

    Ok(Expectations {
        scores,
        counts,
        expectations,
        unlabeled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::maxent::MaxEnt;
    use crate::constraint::constraint_set::ConstraintSet;
    use crate::data::feature_vector::FeatureVector;
    use crate::data::instance::Instance;
    use crate::math::ops::almost_equals;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn instances() -> InstanceList {
        let mut list = InstanceList::new(3, 2);
        list.push(Instance::unlabeled("a", FeatureVector::from_pairs(vec![(0, 2.0), (1, 1.0)]).unwrap()).with_weight(0.5))
            .unwrap();
        list.push(Instance::unlabeled("b", FeatureVector::from_pairs(vec![(0, 1.0)]).unwrap()))
            .unwrap();
        list.push(Instance::labeled("c", FeatureVector::binary(vec![0]).unwrap(), 1))
            .unwrap();
        list
    }

    #[test]
    fn counts_are_value_and_instance_weighted() {
        let list = instances();
        let model = MaxEnt::for_instances(&list);
        let config = GeConfig::new(ConstraintSet::new().with(0, vec![0.5, 0.5]).with(3, vec![0.5, 0.5]), 3);
        let mapping = ConstraintMapping::build(&config.constraints);
        let exp = accumulate(&config, &mapping, &model, &list).unwrap();
        let c0 = mapping.get(0).unwrap();
        let cd = mapping.get(3).unwrap();
        assert_abs_diff_eq!(exp.counts[c0], 2.0 * 0.5 + 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(exp.counts[cd], 1.5, epsilon = 1e-12);
        assert_eq!(exp.unlabeled, 2);
        assert_eq!(exp.scores.row(2), &[0.0, 0.0]);
    }

    #[test]
    fn ignoring_values_counts_units() {
        let list = instances();
        let model = MaxEnt::for_instances(&list);
        let config = GeConfig::new(ConstraintSet::new().with(0, vec![0.5, 0.5]), 3).with_use_values(false);
        let mapping = ConstraintMapping::build(&config.constraints);
        let exp = accumulate(&config, &mapping, &model, &list).unwrap();
        assert_abs_diff_eq!(exp.counts[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        let list = instances();
        let mut model = MaxEnt::for_instances(&list);
        model.set_parameter(0, 0, f64::INFINITY);
        let config = GeConfig::new(ConstraintSet::new().with(0, vec![0.5, 0.5]), 3);
        let mapping = ConstraintMapping::build(&config.constraints);
        let err = accumulate(&config, &mapping, &model, &list).unwrap_err();
        assert!(matches!(err, GeError::NonFiniteScore { instance: 0, .. }));
    }

    proptest! {
        #[test]
        fn conditionals_sum_to_one(seed in any::<u64>(), temperature in 0.2f64..5.0, scale in 0.0f64..3.0) {
            let list = instances();
            let mut rng = StdRng::seed_from_u64(seed);
            let model = MaxEnt::random(3, 2, scale, &mut rng);
            let config = GeConfig::new(
                ConstraintSet::new().with(0, vec![0.7, 0.3]).with(1, vec![0.1, 0.9]).with(2, vec![0.5, 0.5]).with(3, vec![0.5, 0.5]),
                3,
            ).with_temperature(temperature);
            let mapping = ConstraintMapping::build(&config.constraints);
            let exp = accumulate(&config, &mapping, &model, &list).unwrap();
            for c in 0..mapping.len() {
                match exp.conditional(c) {
                    Some(p) => {
                        prop_assert!(almost_equals(p.iter().sum::<f64>(), 1.0));
                    }
                    // feature 2 never fires
                    None => {
                        prop_assert_eq!(mapping.feature_at(c), 2);
                    }
                }
            }
        }
    }
}
