use crate::constraint::mapping::ConstraintMapping;
use crate::data::instance::InstanceList;
use crate::ge::config::GeConfig;
use crate::ge::divergence::Divergence;
use crate::ge::expectation::Expectations;
use crate::math::matrix::Matrix;

/// Second pass: scatters the per-instance gradient of the penalty into
/// `gradient` (`L × (F + 1)`, last column = default feature).
///
/// For instance `x` with tempered scores `p(y|x)`, every active constrained
/// feature `f` firing with value `v` contributes `v / count_f * ratio_f[y]`
/// to `g[y]`. With `C = Σ_y p(y|x) g[y]`, label `y` receives
/// `weight_y = scaling * w_x * temperature * p(y|x) * (g[y] - C)`, which is
/// added against every stored feature of `x` and the bias cell.
pub fn assemble(
    config: &GeConfig,
    mapping: &ConstraintMapping,
    instances: &InstanceList,
    expectations: &Expectations,
    divergence: &Divergence,
    gradient: &mut Matrix,
) {
    let num_labels = gradient.rows;
    let default_index = config.default_feature_index;
    let scaling = config.objective_weight;
    let mut constraint_value = vec![0.0; num_labels];

    for (ii, instance) in instances.unlabeled() {
        let fv = &instance.features;
        let scores = expectations.scores.row(ii);
        constraint_value.iter_mut().for_each(|g| *g = 0.0);
        let mut instance_expectation = 0.0;

        // stored features first, then the implicit default feature
        let firing = fv
            .iter()
            .map(|(index, value)| (index, if config.use_values { value } else { 1.0 }))
            .chain(std::iter::once((default_index, 1.0)));

        for (index, val) in firing {
            let Some(c) = mapping.get(index) else {
                continue;
            };
            let count = expectations.counts[c];
            if count == 0.0 {
                continue;
            }
            let share = val / count;
            for (label, &ratio) in divergence.ratios.row(c).iter().enumerate() {
                constraint_value[label] += share * ratio;
                instance_expectation += share * ratio * scores[label];
            }
        }

        for label in 0..num_labels {
            let score = scores[label];
            if score == 0.0 {
                continue;
            }
            let weight = scaling
                * instance.weight
                * config.temperature
                * score
                * (constraint_value[label] - instance_expectation);
            gradient.row_plus_sparse(label, fv, weight);
            let bias = gradient.index_of(label, default_index);
            gradient.data[bias] += weight;
        }
    }
}
