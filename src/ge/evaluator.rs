use std::sync::mpsc;
use std::time::Instant;

use crate::classifier::scorer::LabelScorer;
use crate::constraint::mapping::ConstraintMapping;
use crate::data::instance::InstanceList;
use crate::error::{GeError, Result};
use crate::ge::config::GeConfig;
use crate::ge::stats::EvaluationStats;
use crate::ge::{divergence, expectation, gradient};
use crate::math::matrix::Matrix;

/// What one full evaluation of the criterion observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSummary {
    pub value: f64,
    pub unlabeled: usize,
    pub active: usize,
    pub inert: usize,
}

/// Computes the KL GE penalty and writes its gradient into `gradient`.
///
/// `gradient` must be shaped `L × (F + 1)` and is overwritten. The function
/// keeps no state between calls.
pub fn evaluate_kl_ge<S: LabelScorer + ?Sized>(
    config: &GeConfig,
    mapping: &ConstraintMapping,
    scorer: &S,
    instances: &InstanceList,
    gradient: &mut Matrix,
) -> Result<PassSummary> {
    check_dimensions(config, scorer, instances, gradient)?;
    config.constraints.validate(scorer.num_labels())?;
    gradient.fill(0.0);

    let expectations = expectation::accumulate(config, mapping, scorer, instances)?;
    let div = divergence::compute(config, mapping, &expectations)?;
    gradient::assemble(config, mapping, instances, &expectations, &div, gradient);

    Ok(PassSummary {
        value: div.value,
        unlabeled: expectations.unlabeled,
        active: div.active,
        inert: mapping.len() - div.active,
    })
}

fn check_dimensions<S: LabelScorer + ?Sized>(
    config: &GeConfig,
    scorer: &S,
    instances: &InstanceList,
    gradient: &Matrix,
) -> Result<()> {
    let checks = [
        ("label alphabet", scorer.num_labels(), instances.num_labels()),
        ("data alphabet", scorer.num_features(), instances.num_features()),
        ("default feature index", scorer.default_feature_index(), config.default_feature_index),
        ("gradient rows", scorer.num_labels(), gradient.rows),
        ("gradient columns", scorer.num_features() + 1, gradient.cols),
    ];
    for (what, expected, found) in checks {
        if expected != found {
            return Err(GeError::DimensionMismatch { what, expected, found });
        }
    }
    Ok(())
}

/// Last value and gradient, tagged with the parameter version they were
/// computed for.
#[derive(Debug, Clone, Default)]
pub struct EvaluationCache {
    version: Option<u64>,
    value: f64,
    gradient: Matrix,
}

impl EvaluationCache {
    pub fn is_fresh(&self, version: u64) -> bool {
        self.version == Some(version)
    }

    pub fn invalidate(&mut self) {
        self.version = None;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn gradient(&self) -> &[f64] {
        &self.gradient.data
    }
}

/// Owns the cache, the lazily built constraint mapping and the optional
/// progress channel around `evaluate_kl_ge`.
///
/// The cache answers repeated calls until the scorer reports a new
/// parameter version. The training set is assumed not to change while an
/// evaluator is in use; call `invalidate` otherwise.
pub struct KlGeEvaluator {
    config: GeConfig,
    mapping: Option<ConstraintMapping>,
    cache: EvaluationCache,
    progress_tx: Option<mpsc::Sender<EvaluationStats>>,
    evaluations: usize,
}

impl KlGeEvaluator {
    pub fn new(config: GeConfig) -> Result<KlGeEvaluator> {
        config.validate()?;
        Ok(KlGeEvaluator {
            config,
            mapping: None,
            cache: EvaluationCache::default(),
            progress_tx: None,
            evaluations: 0,
        })
    }

    /// Attaches a channel receiving one `EvaluationStats` per recomputation.
    /// Sending stops silently once the receiver is dropped.
    pub fn with_progress(mut self, tx: mpsc::Sender<EvaluationStats>) -> KlGeEvaluator {
        self.progress_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &GeConfig {
        &self.config
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    /// Number of recomputations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Returns the penalty value and its gradient for the scorer's current
    /// parameters, recomputing only if the parameter version changed.
    ///
    /// `regularization` is the caller's weight-prior term; it is reported in
    /// the emitted `EvaluationStats` and not added to the value.
    ///
    /// With `objective_weight == 0` the value is 0 and the gradient is
    /// zeroed; that answer is cached like any other.
    pub fn evaluate<S: LabelScorer + ?Sized>(
        &mut self,
        scorer: &S,
        instances: &InstanceList,
        regularization: f64,
    ) -> Result<(f64, &[f64])> {
        let version = scorer.version();
        if self.cache.is_fresh(version) {
            return Ok((self.cache.value, &self.cache.gradient.data));
        }

        let rows = scorer.num_labels();
        let cols = scorer.num_features() + 1;
        if self.cache.gradient.rows != rows || self.cache.gradient.cols != cols {
            self.cache.gradient = Matrix::zeros(rows, cols);
        }

        if self.config.objective_weight == 0.0 {
            self.cache.gradient.fill(0.0);
            self.cache.value = 0.0;
            self.cache.version = Some(version);
            return Ok((0.0, &self.cache.gradient.data));
        }

        let t_start = Instant::now();
        let mapping = self
            .mapping
            .get_or_insert_with(|| ConstraintMapping::build(&self.config.constraints));

        // A failed pass leaves the cache stale.
        self.cache.version = None;
        let summary = evaluate_kl_ge(&self.config, mapping, scorer, instances, &mut self.cache.gradient)?;
        self.cache.value = summary.value;
        self.cache.version = Some(version);
        self.evaluations += 1;

        let stats = EvaluationStats {
            evaluation: self.evaluations,
            value: summary.value,
            regularization,
            unlabeled_instances: summary.unlabeled,
            active_constraints: summary.active,
            inert_constraints: summary.inert,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        if let Some(ref tx) = self.progress_tx {
            if tx.send(stats).is_err() {
                self.progress_tx = None;
            }
        }

        Ok((self.cache.value, &self.cache.gradient.data))
    }
}
