//! Translation transform implementation.
//!
//! This module provides a simple translation transform.

use super::trait_::{Jacobian, Transform};
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Vector};

/// Simple Translation Transform.
///
/// Translates points by a fixed offset vector. The parameters are the `D`
/// components of the offset and every parameter affects every point.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationTransform<const D: usize> {
    parameters: Vec<f64>,
}

impl<const D: usize> TranslationTransform<D> {
    /// Create a new translation transform.
    pub fn new(translation: Vector<D>) -> Self {
        Self {
            parameters: translation.iter().copied().collect(),
        }
    }

    /// Identity translation.
    pub fn identity() -> Self {
        Self::new(Vector::zeros())
    }

    /// Get the translation vector.
    pub fn translation(&self) -> Vector<D> {
        Vector::from_column_slice(&self.parameters)
    }
}

impl<const D: usize> Transform<D> for TranslationTransform<D> {
    fn number_of_parameters(&self) -> usize {
        D
    }

    fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        CoreError::check_parameter_count(D, parameters.len())?;
        self.parameters.copy_from_slice(parameters);
        Ok(())
    }

    fn transform_point(&self, point: &Point<D>) -> Option<Point<D>> {
        Some(*point + self.translation())
    }

    fn number_of_nonzero_jacobian_indices(&self) -> usize {
        D
    }

    fn evaluate_jacobian(
        &self,
        _point: &Point<D>,
        jacobian: &mut Jacobian,
        nonzero_indices: &mut Vec<usize>,
    ) {
        *jacobian = Jacobian::identity(D, D);
        nonzero_indices.clear();
        nonzero_indices.extend(0..D);
    }
}
