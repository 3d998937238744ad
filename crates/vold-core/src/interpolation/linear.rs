//! Linear interpolation implementation.
//!
//! N-linear interpolation (bilinear for 2D, trilinear for 3D, quadrilinear
//! for 3D+t) over an [`ImageBuffer`], with the analytic index-space gradient.

use serde::{Deserialize, Serialize};

use super::trait_::Interpolator;
use crate::image::ImageBuffer;
use crate::spatial::{Point, Vector};

/// Linear Interpolator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }

    fn evaluate<const D: usize>(
        image: &ImageBuffer<D>,
        index: &Point<D>,
        with_derivative: bool,
    ) -> Option<(f64, Vector<D>)> {
        let geometry = image.geometry();
        if !geometry.is_inside_continuous_index(index) {
            return None;
        }
        let size = geometry.size();

        // Lower corner of the enclosing cell and the offset inside it. The
        // last node of an axis belongs to the cell below it.
        let mut base = [0usize; D];
        let mut frac = [0.0f64; D];
        for axis in 0..D {
            if size[axis] == 1 {
                continue;
            }
            let lower = (index[axis].floor().max(0.0) as usize).min(size[axis] - 2);
            base[axis] = lower;
            frac[axis] = (index[axis] - lower as f64).clamp(0.0, 1.0);
        }

        let mut value = 0.0;
        let mut derivative = Vector::<D>::zeros();
        let mut factors = [0.0f64; D];
        'corners: for corner in 0..(1usize << D) {
            let mut neighbor = base;
            for axis in 0..D {
                if (corner >> axis) & 1 == 1 {
                    if size[axis] == 1 {
                        continue 'corners;
                    }
                    neighbor[axis] += 1;
                    factors[axis] = frac[axis];
                } else {
                    factors[axis] = 1.0 - frac[axis];
                }
            }

            let sample = image.value_at(&neighbor);
            value += sample * factors.iter().product::<f64>();

            if with_derivative {
                for axis in 0..D {
                    if size[axis] == 1 {
                        continue;
                    }
                    let sign = if (corner >> axis) & 1 == 1 { 1.0 } else { -1.0 };
                    let others: f64 = (0..D)
                        .filter(|&other| other != axis)
                        .map(|other| factors[other])
                        .product();
                    derivative[axis] += sign * others * sample;
                }
            }
        }

        Some((value, derivative))
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate<const D: usize>(&self, image: &ImageBuffer<D>, index: &Point<D>) -> Option<f64> {
        Self::evaluate(image, index, false).map(|(value, _)| value)
    }

    fn interpolate_with_derivative<const D: usize>(
        &self,
        image: &ImageBuffer<D>,
        index: &Point<D>,
    ) -> Option<(f64, Vector<D>)> {
        Self::evaluate(image, index, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageGeometry;

    fn ramp_2d() -> ImageBuffer<2> {
        // f(x, y) = 2x + 3y
        let geometry = ImageGeometry::<2>::with_size([4, 3]).unwrap();
        ImageBuffer::from_fn(geometry, |[x, y]| 2.0 * x as f64 + 3.0 * y as f64)
    }

    #[test]
    fn test_linear_reproduces_linear_function() {
        let image = ramp_2d();
        let interpolator = LinearInterpolator::new();
        let (value, derivative) = interpolator
            .interpolate_with_derivative(&image, &Point::from([1.25, 0.5]))
            .unwrap();
        assert!((value - (2.5 + 1.5)).abs() < 1e-12);
        assert!((derivative[0] - 2.0).abs() < 1e-12);
        assert!((derivative[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_at_upper_boundary() {
        let image = ramp_2d();
        let interpolator = LinearInterpolator::new();
        let value = interpolator.interpolate(&image, &Point::from([3.0, 2.0])).unwrap();
        assert!((value - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_outside_returns_none() {
        let image = ramp_2d();
        let interpolator = LinearInterpolator::new();
        assert!(interpolator.interpolate(&image, &Point::from([-0.5, 1.0])).is_none());
        assert!(interpolator.interpolate(&image, &Point::from([1.0, 2.5])).is_none());
    }

    #[test]
    fn test_linear_singleton_axis() {
        let geometry = ImageGeometry::<2>::with_size([3, 1]).unwrap();
        let image = ImageBuffer::from_fn(geometry, |[x, _]| x as f64 * x as f64);
        let interpolator = LinearInterpolator::new();
        let (value, derivative) = interpolator
            .interpolate_with_derivative(&image, &Point::from([1.5, 0.0]))
            .unwrap();
        assert!((value - 2.5).abs() < 1e-12);
        assert!((derivative[0] - 3.0).abs() < 1e-12);
        assert_eq!(derivative[1], 0.0);
    }

    #[test]
    fn test_linear_derivative_matches_finite_difference() {
        let geometry = ImageGeometry::<3>::with_size([4, 4, 3]).unwrap();
        let image = ImageBuffer::from_fn(geometry, |[x, y, z]| {
            ((x * 7 + y * 3 + z * 11) % 5) as f64
        });
        let interpolator = LinearInterpolator::new();
        let index = Point::from([1.3, 2.6, 0.4]);
        let (_, derivative) = interpolator.interpolate_with_derivative(&image, &index).unwrap();
        let eps = 1e-6;
        for axis in 0..3 {
            let mut forward = index;
            let mut backward = index;
            forward[axis] += eps;
            backward[axis] -= eps;
            let fd = (interpolator.interpolate(&image, &forward).unwrap()
                - interpolator.interpolate(&image, &backward).unwrap())
                / (2.0 * eps);
            assert!((fd - derivative[axis]).abs() < 1e-6, "axis {}: {} vs {}", axis, fd, derivative[axis]);
        }
    }
}
