//! CPU-resident image buffer used for point-wise sampling.

use super::geometry::ImageGeometry;
use crate::error::{CoreError, Result};

/// Image values in a flat `f64` buffer, index axis 0 fastest.
///
/// Per-point interpolation touches a handful of voxels at a time, which is
/// far cheaper on a plain slice than through tensor gathers.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer<const D: usize> {
    geometry: ImageGeometry<D>,
    values: Vec<f64>,
}

impl<const D: usize> ImageBuffer<D> {
    /// Wrap `values` laid out in index order for `geometry`.
    pub fn new(geometry: ImageGeometry<D>, values: Vec<f64>) -> Result<Self> {
        if values.len() != geometry.number_of_voxels() {
            return Err(CoreError::ShapeMismatch {
                expected: vec![geometry.number_of_voxels()],
                actual: vec![values.len()],
            });
        }
        Ok(Self { geometry, values })
    }

    /// Fill a buffer by evaluating `f` at every discrete index.
    pub fn from_fn(geometry: ImageGeometry<D>, mut f: impl FnMut([usize; D]) -> f64) -> Self {
        let values = super::grid::grid_indices(geometry.size()).map(&mut f).collect();
        Self { geometry, values }
    }

    pub fn geometry(&self) -> &ImageGeometry<D> {
        &self.geometry
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at a discrete index. Panics if the index is outside the grid.
    pub fn value_at(&self, index: &[usize; D]) -> f64 {
        self.values[self.geometry.offset(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length_checked() {
        let geometry = ImageGeometry::<2>::with_size([2, 3]).unwrap();
        assert!(ImageBuffer::new(geometry.clone(), vec![0.0; 6]).is_ok());
        let err = ImageBuffer::new(geometry, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, CoreError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_fn_matches_offsets() {
        let geometry = ImageGeometry::<3>::with_size([2, 3, 4]).unwrap();
        let buffer = ImageBuffer::from_fn(geometry, |[x, y, z]| (100 * z + 10 * y + x) as f64);
        assert_eq!(buffer.value_at(&[1, 2, 3]), 321.0);
        assert_eq!(buffer.value_at(&[0, 1, 0]), 10.0);
        assert_eq!(buffer.values().len(), 24);
    }
}
