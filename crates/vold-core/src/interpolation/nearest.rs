//! Nearest neighbor interpolation implementation.

use serde::{Deserialize, Serialize};

use super::trait_::Interpolator;
use crate::image::ImageBuffer;
use crate::spatial::{Point, Vector};

/// Nearest Neighbor Interpolator.
///
/// Returns the value of the closest grid node. The derivative of a
/// piecewise-constant function is zero almost everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }

    /// Closest discrete index, or `None` outside the buffer.
    pub fn nearest_index<const D: usize>(image: &ImageBuffer<D>, index: &Point<D>) -> Option<[usize; D]> {
        let geometry = image.geometry();
        if !geometry.is_inside_continuous_index(index) {
            return None;
        }
        let size = geometry.size();
        Some(std::array::from_fn(|axis| {
            (index[axis].round().max(0.0) as usize).min(size[axis] - 1)
        }))
    }
}

impl Interpolator for NearestNeighborInterpolator {
    fn interpolate<const D: usize>(&self, image: &ImageBuffer<D>, index: &Point<D>) -> Option<f64> {
        Self::nearest_index(image, index).map(|nearest| image.value_at(&nearest))
    }

    fn interpolate_with_derivative<const D: usize>(
        &self,
        image: &ImageBuffer<D>,
        index: &Point<D>,
    ) -> Option<(f64, Vector<D>)> {
        self.interpolate(image, index).map(|value| (value, Vector::zeros()))
    }
}
