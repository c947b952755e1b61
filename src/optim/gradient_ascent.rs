use crate::error::Result;
use crate::optim::optimizable::Optimizable;

/// Fixed-step gradient ascent. Enough to drive an `Optimizable` in demos
/// and tests; real training should use a line-search optimizer.
pub struct GradientAscent {
    pub learning_rate: f64,
}

impl GradientAscent {
    pub fn new(learning_rate: f64) -> GradientAscent {
        GradientAscent { learning_rate }
    }

    /// Takes one step `θ += lr * ∇value(θ)` and returns the value at the
    /// starting point.
    pub fn step<O: Optimizable + ?Sized>(&self, objective: &mut O) -> Result<f64> {
        let n = objective.num_parameters();
        let mut params = vec![0.0; n];
        let mut gradient = vec![0.0; n];

        let value = objective.value()?;
        objective.value_gradient(&mut gradient)?;
        objective.get_parameters(&mut params)?;
        for (p, g) in params.iter_mut().zip(&gradient) {
            *p += self.learning_rate * g;
        }
        objective.set_parameters(&params)?;
        Ok(value)
    }

    /// Runs `iterations` steps and returns the value observed before each.
    pub fn maximize<O: Optimizable + ?Sized>(&self, objective: &mut O, iterations: usize) -> Result<Vec<f64>> {
        let mut trace = Vec::with_capacity(iterations);
        for iteration in 1..=iterations {
            let value = self.step(objective)?;
            log::debug!("gradient ascent iteration {iteration}: value = {value:.6}");
            trace.push(value);
        }
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// -(x - 3)^2
    struct Parabola {
        x: f64,
    }

    impl Optimizable for Parabola {
        fn num_parameters(&self) -> usize {
            1
        }

        fn get_parameters(&self, buffer: &mut [f64]) -> Result<()> {
            buffer[0] = self.x;
            Ok(())
        }

        fn set_parameters(&mut self, params: &[f64]) -> Result<()> {
            self.x = params[0];
            Ok(())
        }

        fn value(&mut self) -> Result<f64> {
            Ok(-(self.x - 3.0).powi(2))
        }

        fn value_gradient(&mut self, buffer: &mut [f64]) -> Result<()> {
            buffer[0] = -2.0 * (self.x - 3.0);
            Ok(())
        }
    }

    #[test]
    fn climbs_to_the_maximum() {
        let mut p = Parabola { x: 0.0 };
        let trace = GradientAscent::new(0.1).maximize(&mut p, 100).unwrap();
        assert!(trace.windows(2).all(|w| w[1] >= w[0]));
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-6);
    }
}
