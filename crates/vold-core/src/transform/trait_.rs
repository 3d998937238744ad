//! Transform trait for spatial coordinate transformations.
//!
//! This module defines the parametric transform capability consumed by
//! registration metrics: point mapping with a validity report, and the
//! sparse Jacobian with respect to the transform parameters.

use nalgebra::DMatrix;

use crate::error::Result;
use crate::spatial::Point;

/// Jacobian of a mapped point with respect to the transform parameters.
///
/// Shape `[D, n]` where `n` is the number of nonzero Jacobian indices: column
/// `k` holds `dT(x)/dmu_j` for parameter `j = nonzero_indices[k]`.
pub type Jacobian = DMatrix<f64>;

/// Parametric transform mapping fixed-space points to moving-space points.
///
/// # Type Parameters
/// * `D` - The dimensionality of the points
pub trait Transform<const D: usize> {
    /// Length of the parameter vector.
    fn number_of_parameters(&self) -> usize;

    /// Current parameter vector.
    fn parameters(&self) -> &[f64];

    /// Replace the parameter vector. The length must match
    /// [`number_of_parameters`](Self::number_of_parameters).
    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()>;

    /// Map a point, or `None` if the point lies outside the region where the
    /// transform is defined.
    fn transform_point(&self, point: &Point<D>) -> Option<Point<D>>;

    /// Number of parameters that can influence a single point.
    fn number_of_nonzero_jacobian_indices(&self) -> usize;

    /// Evaluate the Jacobian at `point`.
    ///
    /// `jacobian` is resized to `[D, n]` and `nonzero_indices` to `n`, with
    /// `n` = [`number_of_nonzero_jacobian_indices`](Self::number_of_nonzero_jacobian_indices).
    fn evaluate_jacobian(
        &self,
        point: &Point<D>,
        jacobian: &mut Jacobian,
        nonzero_indices: &mut Vec<usize>,
    );
}
