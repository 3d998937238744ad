//! Image masks restricting where samples are considered valid.

use burn::tensor::backend::Backend;

use crate::error::Result;
use crate::image::{Image, ImageBuffer};
use crate::interpolation::NearestNeighborInterpolator;
use crate::spatial::Point;

/// Spatial mask over physical space.
pub trait ImageMask<const D: usize> {
    /// Whether `point` lies inside the valid region.
    fn is_inside(&self, point: &Point<D>) -> bool;
}

/// Mask defined by the nonzero voxels of an image.
///
/// A point is inside when its nearest voxel is nonzero. Points outside the
/// image grid are outside the mask.
#[derive(Debug, Clone)]
pub struct BinaryImageMask<const D: usize> {
    buffer: ImageBuffer<D>,
}

impl<const D: usize> BinaryImageMask<D> {
    pub fn new(buffer: ImageBuffer<D>) -> Self {
        Self { buffer }
    }

    /// Read a mask image back from its backend.
    pub fn from_image<B: Backend>(image: &Image<B, D>) -> Result<Self> {
        Ok(Self::new(image.to_buffer()?))
    }

    /// Fraction of voxels inside the mask.
    pub fn coverage(&self) -> f64 {
        let values = self.buffer.values();
        values.iter().filter(|&&v| v != 0.0).count() as f64 / values.len() as f64
    }
}

impl<const D: usize> ImageMask<D> for BinaryImageMask<D> {
    fn is_inside(&self, point: &Point<D>) -> bool {
        let index = self
            .buffer
            .geometry()
            .transform_physical_point_to_continuous_index(point);
        NearestNeighborInterpolator::nearest_index(&self.buffer, &index)
            .map(|nearest| self.buffer.value_at(&nearest) != 0.0)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageGeometry;

    #[test]
    fn test_binary_mask() {
        let geometry = ImageGeometry::<2>::with_size([4, 4]).unwrap();
        let buffer = ImageBuffer::from_fn(geometry, |[x, _]| if x < 2 { 1.0 } else { 0.0 });
        let mask = BinaryImageMask::new(buffer);

        assert!(mask.is_inside(&Point::from([1.2, 3.0])));
        assert!(!mask.is_inside(&Point::from([2.2, 3.0])));
        assert!(!mask.is_inside(&Point::from([-1.0, 0.0])));
        assert!((mask.coverage() - 0.5).abs() < 1e-12);
    }
}
