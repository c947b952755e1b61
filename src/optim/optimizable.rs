use crate::error::Result;

/// Objective surface an iterative optimizer drives: read and write a flat
/// parameter vector, then ask for the value and gradient at that point.
///
/// The objective is maximized. Implementations may cache the value and
/// gradient until `set_parameters` is called.
pub trait Optimizable {
    fn num_parameters(&self) -> usize;

    fn get_parameters(&self, buffer: &mut [f64]) -> Result<()>;

    fn set_parameters(&mut self, params: &[f64]) -> Result<()>;

    fn value(&mut self) -> Result<f64>;

    /// Writes the gradient of `value` into `buffer`.
    fn value_gradient(&mut self, buffer: &mut [f64]) -> Result<()>;
}
