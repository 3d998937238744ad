//! Metric trait for image similarity measurement.
//!
//! This module defines the core Metric trait that all similarity metrics
//! must implement for image registration.

use nalgebra::DVector;

use crate::error::Result;
use crate::sampler::ImageSample;

/// Metric trait for measuring similarity under a parametric transform.
///
/// Lower values indicate better alignment. Evaluation takes `&self` and
/// keeps all running totals local to the call, so a metric can be shared
/// between threads once its parameters are set.
///
/// # Type Parameters
/// * `D` - The image dimensionality
pub trait Metric<const D: usize> {
    /// Length of the parameter (and gradient) vector.
    fn number_of_parameters(&self) -> usize;

    /// Set the transform parameters used by subsequent evaluations.
    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()>;

    /// Metric value over `samples` at the current parameters.
    fn value(&self, samples: &[ImageSample<D>]) -> Result<f64>;

    /// Metric value and its gradient with respect to the parameters.
    fn value_and_derivative(&self, samples: &[ImageSample<D>]) -> Result<(f64, DVector<f64>)>;

    /// Gradient only; the value comes for free, so this delegates.
    fn derivative(&self, samples: &[ImageSample<D>]) -> Result<DVector<f64>> {
        self.value_and_derivative(samples).map(|(_, derivative)| derivative)
    }

    /// Set `parameters`, then evaluate the value.
    fn get_value(&mut self, parameters: &[f64], samples: &[ImageSample<D>]) -> Result<f64> {
        self.set_parameters(parameters)?;
        self.value(samples)
    }

    /// Set `parameters`, then evaluate value and gradient.
    fn get_value_and_derivative(
        &mut self,
        parameters: &[f64],
        samples: &[ImageSample<D>],
    ) -> Result<(f64, DVector<f64>)> {
        self.set_parameters(parameters)?;
        self.value_and_derivative(samples)
    }

    /// Get the name of this metric.
    fn name(&self) -> &'static str;
}
