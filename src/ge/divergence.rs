use crate::constraint::mapping::ConstraintMapping;
use crate::error::{GeError, Result};
use crate::ge::config::GeConfig;
use crate::ge::expectation::Expectations;
use crate::math::matrix::Matrix;

/// Penalty value plus the per-label `reference / model` ratios that the
/// gradient pass reuses.
#[derive(Debug, Clone)]
pub struct Divergence {
    /// `-objective_weight * Σ_f KL(reference_f ‖ model_f)`, always `<= 0`.
    pub value: f64,
    /// `K × L`; rows of inert features are zero.
    pub ratios: Matrix,
    /// Constrained features that fired at least once.
    pub active: usize,
}

/// Normalizes the accumulated expectations and scores them against the
/// reference distributions.
///
/// Features with a zero occurrence count are inert: they add nothing to the
/// value and keep a zero ratio row. Labels with zero reference weight add
/// nothing either (`0 · log q = 0`). A model probability that underflowed to
/// zero under a positive reference weight is an error rather than an
/// infinite ratio.
pub fn compute(config: &GeConfig, mapping: &ConstraintMapping, expectations: &Expectations) -> Result<Divergence> {
    let num_labels = expectations.expectations.cols;
    let scaling = config.objective_weight;
    let mut ratios = Matrix::zeros(mapping.len(), num_labels);
    let mut value = 0.0;
    let mut active = 0;

    for (feature, reference) in config.constraints.iter() {
        let Some(c) = mapping.get(feature) else {
            continue;
        };
        let Some(model) = expectations.conditional(c) else {
            continue;
        };
        active += 1;

        for (label, (&r, &q)) in reference.iter().zip(model.iter()).enumerate() {
            if r <= 0.0 {
                continue;
            }
            if q <= 0.0 || !q.is_finite() {
                return Err(GeError::DegenerateExpectation { feature, label });
            }
            ratios.set(c, label, r / q);
            // cross entropy and entropy terms
            value += scaling * r * q.ln();
            value -= scaling * r * r.ln();
        }
    }

    Ok(Divergence { value, ratios, active })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::constraint_set::ConstraintSet;
    use approx::assert_abs_diff_eq;

    fn expectations(counts: Vec<f64>, sums: Vec<f64>) -> Expectations {
        let k = counts.len();
        Expectations {
            scores: Matrix::zeros(0, 2),
            counts,
            expectations: Matrix::from_flat(k, 2, sums),
            unlabeled: 0,
        }
    }

    #[test]
    fn value_is_negative_scaled_kl() {
        let config = GeConfig::new(ConstraintSet::new().with(0, vec![0.7, 0.3]), 9).with_objective_weight(2.0);
        let mapping = ConstraintMapping::build(&config.constraints);
        // model conditional [0.5, 0.5]
        let div = compute(&config, &mapping, &expectations(vec![4.0], vec![2.0, 2.0])).unwrap();
        let kl = 0.7 * (0.7f64 / 0.5).ln() + 0.3 * (0.3f64 / 0.5).ln();
        assert_abs_diff_eq!(div.value, -2.0 * kl, epsilon = 1e-12);
        assert_abs_diff_eq!(div.ratios.get(0, 0), 1.4, epsilon = 1e-12);
        assert_abs_diff_eq!(div.ratios.get(0, 1), 0.6, epsilon = 1e-12);
        assert_eq!(div.active, 1);
    }

    #[test]
    fn matching_distributions_score_zero() {
        let config = GeConfig::new(ConstraintSet::new().with(0, vec![0.25, 0.75]), 9);
        let mapping = ConstraintMapping::build(&config.constraints);
        let div = compute(&config, &mapping, &expectations(vec![2.0], vec![0.5, 1.5])).unwrap();
        assert_abs_diff_eq!(div.value, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn inert_features_contribute_nothing() {
        let config = GeConfig::new(ConstraintSet::new().with(0, vec![0.9, 0.1]).with(1, vec![0.5, 0.5]), 9);
        let mapping = ConstraintMapping::build(&config.constraints);
        let div = compute(&config, &mapping, &expectations(vec![0.0, 1.0], vec![0.0, 0.0, 0.5, 0.5])).unwrap();
        assert_eq!(div.value, 0.0);
        assert_eq!(div.active, 1);
        assert_eq!(div.ratios.row(mapping.get(0).unwrap()), &[0.0, 0.0]);
    }

    #[test]
    fn zero_reference_weight_is_skipped() {
        let config = GeConfig::new(ConstraintSet::new().with(0, vec![1.0, 0.0]), 9);
        let mapping = ConstraintMapping::build(&config.constraints);
        let div = compute(&config, &mapping, &expectations(vec![1.0], vec![0.8, 0.2])).unwrap();
        assert_abs_diff_eq!(div.value, 0.8f64.ln(), epsilon = 1e-12);
        assert_eq!(div.ratios.get(0, 1), 0.0);
    }

    #[test]
    fn underflowed_model_probability_is_rejected() {
        let config = GeConfig::new(ConstraintSet::new().with(5, vec![0.5, 0.5]), 9);
        let mapping = ConstraintMapping::build(&config.constraints);
        let err = compute(&config, &mapping, &expectations(vec![2.0], vec![2.0, 0.0])).unwrap_err();
        assert!(matches!(err, GeError::DegenerateExpectation { feature: 5, label: 1 }));
    }
}
