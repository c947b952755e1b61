use serde::{Serialize, Deserialize};

/// Diagnostics emitted by `KlGeEvaluator` after every recomputation.
///
/// When a progress channel is attached, one `EvaluationStats` is sent per
/// recomputation; cached answers emit nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    /// 1-based count of recomputations performed by this evaluator.
    pub evaluation: usize,
    /// The GE penalty (`-objective_weight * Σ KL`).
    pub value: f64,
    /// Weight-prior term supplied by the caller, reported for visibility only.
    pub regularization: f64,
    /// Unlabeled instances visited by each pass.
    pub unlabeled_instances: usize,
    /// Constrained features that fired at least once.
    pub active_constraints: usize,
    /// Constrained features that never fired and were skipped.
    pub inert_constraints: usize,
    /// Wall-clock duration of the recomputation in milliseconds.
    pub elapsed_ms: u64,
}
