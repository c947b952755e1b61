use crate::error::{GeError, Result};

/// Zero-mean Gaussian prior on every classifier weight.
///
/// Contributes `-Σθ²/(2σ²)` to a maximized objective and `-θ/σ²` to its
/// gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianPrior {
    variance: f64,
}

impl Default for GaussianPrior {
    fn default() -> Self {
        GaussianPrior { variance: 1.0 }
    }
}

impl GaussianPrior {
    /// Fails unless `variance` is finite and strictly positive.
    pub fn new(variance: f64) -> Result<GaussianPrior> {
        if !variance.is_finite() || variance <= 0.0 {
            return Err(GeError::InvalidVariance(variance));
        }
        Ok(GaussianPrior { variance })
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn value(&self, params: &[f64]) -> f64 {
        -params.iter().map(|p| p * p).sum::<f64>() / (2.0 * self.variance)
    }

    /// Adds the prior's gradient into `gradient`.
    pub fn add_gradient(&self, params: &[f64], gradient: &mut [f64]) {
        for (g, p) in gradient.iter_mut().zip(params) {
            *g -= p / self.variance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn value_and_gradient() {
        let prior = GaussianPrior::new(2.0).unwrap();
        let params = [1.0, -2.0];
        assert_abs_diff_eq!(prior.value(&params), -1.25, epsilon = 1e-12);
        let mut grad = [0.0, 1.0];
        prior.add_gradient(&params, &mut grad);
        assert_eq!(grad, [-0.5, 2.0]);
    }

    #[test]
    fn rejects_degenerate_variance() {
        for variance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(GaussianPrior::new(variance), Err(GeError::InvalidVariance(_))));
        }
        assert_eq!(GaussianPrior::default().variance(), 1.0);
    }
}
