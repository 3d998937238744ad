//! Affine transform implementation.

use nalgebra::SMatrix;

use super::trait_::{Jacobian, Transform};
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Vector};

/// Affine Transform about a fixed center.
///
/// `T(x) = A (x - c) + c + t`
///
/// Parameters are the entries of `A` in row-major order followed by the
/// translation `t`, `D * D + D` in total.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform<const D: usize> {
    parameters: Vec<f64>,
    center: Point<D>,
}

impl<const D: usize> AffineTransform<D> {
    /// Identity affine transform rotating/scaling about `center`.
    pub fn identity(center: Point<D>) -> Self {
        Self::new(SMatrix::identity(), Vector::zeros(), center)
    }

    /// Create an affine transform from its matrix, translation and center.
    pub fn new(matrix: SMatrix<f64, D, D>, translation: Vector<D>, center: Point<D>) -> Self {
        let mut parameters = Vec::with_capacity(D * D + D);
        for row in 0..D {
            for col in 0..D {
                parameters.push(matrix[(row, col)]);
            }
        }
        parameters.extend(translation.iter().copied());
        Self { parameters, center }
    }

    pub fn matrix(&self) -> SMatrix<f64, D, D> {
        SMatrix::from_row_slice(&self.parameters[..D * D])
    }

    pub fn translation(&self) -> Vector<D> {
        Vector::from_column_slice(&self.parameters[D * D..])
    }

    pub fn center(&self) -> &Point<D> {
        &self.center
    }
}

impl<const D: usize> Transform<D> for AffineTransform<D> {
    fn number_of_parameters(&self) -> usize {
        D * D + D
    }

    fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        CoreError::check_parameter_count(self.number_of_parameters(), parameters.len())?;
        self.parameters.copy_from_slice(parameters);
        Ok(())
    }

    fn transform_point(&self, point: &Point<D>) -> Option<Point<D>> {
        let offset = *point - self.center;
        Some(self.center + self.matrix() * offset + self.translation())
    }

    fn number_of_nonzero_jacobian_indices(&self) -> usize {
        self.number_of_parameters()
    }

    fn evaluate_jacobian(
        &self,
        point: &Point<D>,
        jacobian: &mut Jacobian,
        nonzero_indices: &mut Vec<usize>,
    ) {
        let n = self.number_of_parameters();
        *jacobian = Jacobian::zeros(D, n);
        let offset = *point - self.center;
        for row in 0..D {
            for col in 0..D {
                jacobian[(row, row * D + col)] = offset[col];
            }
            jacobian[(row, D * D + row)] = 1.0;
        }
        nonzero_indices.clear();
        nonzero_indices.extend(0..n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_identity() {
        let transform = AffineTransform::<2>::identity(Point::from([1.0, 1.0]));
        let p = Point::from([3.0, -2.0]);
        assert_eq!(transform.transform_point(&p), Some(p));
        assert_eq!(transform.number_of_parameters(), 6);
    }

    #[test]
    fn test_affine_about_center() {
        // 90 degree rotation about (1, 0).
        let matrix = SMatrix::<f64, 2, 2>::new(0.0, -1.0, 1.0, 0.0);
        let transform =
            AffineTransform::new(matrix, Vector::<2>::new(0.0, 0.5), Point::from([1.0, 0.0]));
        let moved = transform.transform_point(&Point::from([2.0, 0.0])).unwrap();
        assert!((moved - Point::from([1.0, 1.5])).norm() < 1e-12);
    }

    #[test]
    fn test_affine_jacobian_matches_finite_difference() {
        let matrix = SMatrix::<f64, 2, 2>::new(1.1, 0.2, -0.3, 0.9);
        let mut transform =
            AffineTransform::new(matrix, Vector::<2>::new(0.4, -0.1), Point::from([0.5, 0.5]));
        let point = Point::from([2.0, -1.0]);
        let mut jacobian = Jacobian::zeros(0, 0);
        let mut indices = Vec::new();
        transform.evaluate_jacobian(&point, &mut jacobian, &mut indices);
        assert_eq!(indices, (0..6).collect::<Vec<_>>());

        let base = transform.parameters().to_vec();
        let eps = 1e-6;
        for j in 0..6 {
            let mut shifted = base.clone();
            shifted[j] += eps;
            transform.set_parameters(&shifted).unwrap();
            let forward = transform.transform_point(&point).unwrap();
            transform.set_parameters(&base).unwrap();
            let reference = transform.transform_point(&point).unwrap();
            for row in 0..2 {
                let fd = (forward[row] - reference[row]) / eps;
                assert!((fd - jacobian[(row, j)]).abs() < 1e-6);
            }
        }
    }
}
