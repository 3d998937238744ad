//! Translation stack transform.
//!
//! One independent translation of the spatial axes per slice of the last
//! axis. This is the natural transform for aligning the frames of a 2D+t or
//! 3D+t sequence: each point only depends on the parameters of its own frame,
//! so the Jacobian is sparse.

use super::trait_::{Jacobian, Transform};
use crate::error::{CoreError, Result};
use crate::spatial::Point;

/// Per-slice translation of the first `D - 1` axes.
///
/// Slice `s` covers last-axis coordinate `origin + s * spacing`. Parameters
/// are laid out slice by slice: `[t_0[0..D-1], t_1[0..D-1], ...]`. The last
/// coordinate of a point is never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationStackTransform<const D: usize> {
    number_of_slices: usize,
    last_dimension_origin: f64,
    last_dimension_spacing: f64,
    parameters: Vec<f64>,
}

impl<const D: usize> TranslationStackTransform<D> {
    /// Identity stack with `number_of_slices` slices.
    pub fn new(
        number_of_slices: usize,
        last_dimension_origin: f64,
        last_dimension_spacing: f64,
    ) -> Result<Self> {
        if D < 2 {
            return Err(CoreError::invalid_argument(
                "a stack transform needs at least one spatial axis and the last axis",
            ));
        }
        if number_of_slices == 0 {
            return Err(CoreError::invalid_argument("stack has no slices"));
        }
        if !last_dimension_spacing.is_finite() || last_dimension_spacing <= 0.0 {
            return Err(CoreError::invalid_spacing(format!(
                "last dimension spacing must be positive, got {}",
                last_dimension_spacing
            )));
        }
        Ok(Self {
            number_of_slices,
            last_dimension_origin,
            last_dimension_spacing,
            parameters: vec![0.0; number_of_slices * (D - 1)],
        })
    }

    pub fn number_of_slices(&self) -> usize {
        self.number_of_slices
    }

    /// Slice addressed by the last coordinate of `point`, if any.
    pub fn slice_of(&self, point: &Point<D>) -> Option<usize> {
        let position =
            ((point[D - 1] - self.last_dimension_origin) / self.last_dimension_spacing).round();
        if position < 0.0 || position >= self.number_of_slices as f64 {
            None
        } else {
            Some(position as usize)
        }
    }

    /// Translation parameters of one slice.
    pub fn slice_translation(&self, slice: usize) -> &[f64] {
        let start = slice * (D - 1);
        &self.parameters[start..start + D - 1]
    }
}

impl<const D: usize> Transform<D> for TranslationStackTransform<D> {
    fn number_of_parameters(&self) -> usize {
        self.parameters.len()
    }

    fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        CoreError::check_parameter_count(self.parameters.len(), parameters.len())?;
        self.parameters.copy_from_slice(parameters);
        Ok(())
    }

    fn transform_point(&self, point: &Point<D>) -> Option<Point<D>> {
        let slice = self.slice_of(point)?;
        let mut mapped = *point;
        for (axis, offset) in self.slice_translation(slice).iter().enumerate() {
            mapped[axis] += offset;
        }
        Some(mapped)
    }

    fn number_of_nonzero_jacobian_indices(&self) -> usize {
        D - 1
    }

    fn evaluate_jacobian(
        &self,
        point: &Point<D>,
        jacobian: &mut Jacobian,
        nonzero_indices: &mut Vec<usize>,
    ) {
        *jacobian = Jacobian::zeros(D, D - 1);
        for axis in 0..D - 1 {
            jacobian[(axis, axis)] = 1.0;
        }
        // Points outside the stack still get a well-formed index set.
        let slice = self.slice_of(point).unwrap_or(0);
        nonzero_indices.clear();
        nonzero_indices.extend(slice * (D - 1)..(slice + 1) * (D - 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_moves_only_its_slice() {
        let mut transform = TranslationStackTransform::<3>::new(3, 0.0, 1.0).unwrap();
        assert_eq!(transform.number_of_parameters(), 6);
        transform
            .set_parameters(&[0.0, 0.0, 1.0, -1.0, 0.0, 0.0])
            .unwrap();

        let moved = transform.transform_point(&Point::from([2.0, 2.0, 1.0])).unwrap();
        assert_eq!(moved, Point::from([3.0, 1.0, 1.0]));
        let unmoved = transform.transform_point(&Point::from([2.0, 2.0, 2.0])).unwrap();
        assert_eq!(unmoved, Point::from([2.0, 2.0, 2.0]));
    }

    #[test]
    fn test_stack_outside_slices_is_invalid() {
        let transform = TranslationStackTransform::<2>::new(4, 10.0, 2.0).unwrap();
        assert!(transform.transform_point(&Point::from([0.0, 9.0])).is_none());
        assert!(transform.transform_point(&Point::from([0.0, 17.0])).is_none());
        assert_eq!(transform.slice_of(&Point::from([0.0, 16.2])), Some(3));
    }

    #[test]
    fn test_stack_sparse_jacobian() {
        let transform = TranslationStackTransform::<3>::new(4, 0.0, 1.0).unwrap();
        let mut jacobian = Jacobian::zeros(0, 0);
        let mut indices = Vec::new();
        transform.evaluate_jacobian(&Point::from([0.5, 0.5, 2.0]), &mut jacobian, &mut indices);
        assert_eq!(indices, vec![4, 5]);
        assert_eq!(jacobian.shape(), (3, 2));
        assert_eq!(jacobian[(0, 0)], 1.0);
        assert_eq!(jacobian[(1, 1)], 1.0);
        assert_eq!(jacobian[(2, 0)], 0.0);
        assert_eq!(jacobian[(0, 1)], 0.0);
    }

    #[test]
    fn test_stack_rejects_invalid_construction() {
        assert!(TranslationStackTransform::<1>::new(3, 0.0, 1.0).is_err());
        assert!(TranslationStackTransform::<2>::new(0, 0.0, 1.0).is_err());
        assert!(TranslationStackTransform::<2>::new(3, 0.0, 0.0).is_err());
    }
}
