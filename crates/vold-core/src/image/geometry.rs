//! Image geometry: grid size plus the physical-space metadata that maps
//! continuous indices to physical points and back.

use crate::error::{CoreError, Result};
use crate::spatial::{Direction, Point, Spacing, Vector};

/// Slack, in index units, tolerated when testing whether a continuous index
/// lies inside the grid. Absorbs round-off from physical/index round trips.
const INSIDE_TOLERANCE: f64 = 1e-6;

/// Geometry of a D-dimensional image grid.
///
/// Index axis 0 is the fastest-varying axis of the underlying buffer and
/// index axis `D - 1` the slowest, so a tensor of shape
/// `[size[D-1], ..., size[1], size[0]]` is laid out in index order.
///
/// # Coordinate Systems
/// * **Index Space**: continuous grid coordinates, node `i` at integer `i`
/// * **Physical Space**: `point = origin + Direction * (index * spacing)`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGeometry<const D: usize> {
    size: [usize; D],
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
    inverse_direction: Direction<D>,
}

impl<const D: usize> ImageGeometry<D> {
    /// Create a new geometry.
    ///
    /// Fails if any axis is empty, if the spacing is not strictly positive,
    /// or if the direction matrix is singular.
    pub fn new(
        size: [usize; D],
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Result<Self> {
        if let Some(axis) = size.iter().position(|&s| s == 0) {
            return Err(CoreError::invalid_argument(format!(
                "image size along axis {} is zero",
                axis
            )));
        }
        if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(CoreError::invalid_spacing(format!(
                "spacing must be positive, got {:?}",
                spacing.as_slice()
            )));
        }
        let inverse_direction = direction.try_inverse().ok_or_else(|| {
            CoreError::singular_direction("direction matrix is not invertible")
        })?;

        Ok(Self {
            size,
            origin,
            spacing,
            direction,
            inverse_direction,
        })
    }

    /// Geometry with zero origin, unit spacing and identity direction.
    pub fn with_size(size: [usize; D]) -> Result<Self> {
        Self::new(
            size,
            Point::origin(),
            Spacing::repeat(1.0),
            Direction::identity(),
        )
    }

    /// Grid size along each index axis.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Total number of grid nodes.
    pub fn number_of_voxels(&self) -> usize {
        self.size.iter().product()
    }

    /// Tensor shape for this geometry (slowest axis first).
    pub fn tensor_shape(&self) -> [usize; D] {
        let mut shape = self.size;
        shape.reverse();
        shape
    }

    /// Map a physical point to a continuous index:
    /// `index = (Direction^-1 * (point - origin)) / spacing`.
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point<D>) -> Point<D> {
        let rotated = self.inverse_direction * (*point - self.origin);
        Point::from(rotated.component_div(&self.spacing))
    }

    /// Map a continuous index to a physical point:
    /// `point = origin + Direction * (index * spacing)`.
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        self.origin + self.direction * index.coords.component_mul(&self.spacing)
    }

    /// Map a discrete grid index to a physical point.
    pub fn transform_index_to_physical_point(&self, index: &[usize; D]) -> Point<D> {
        let continuous = Point::from(std::array::from_fn::<f64, D, _>(|i| index[i] as f64));
        self.transform_continuous_index_to_physical_point(&continuous)
    }

    /// Whether a continuous index lies within `[0, size - 1]` on every axis.
    pub fn is_inside_continuous_index(&self, index: &Point<D>) -> bool {
        (0..D).all(|i| {
            let upper = (self.size[i] - 1) as f64;
            index[i] >= -INSIDE_TOLERANCE && index[i] <= upper + INSIDE_TOLERANCE
        })
    }

    /// Convert a derivative taken with respect to continuous index coordinates
    /// into a derivative with respect to physical coordinates:
    /// `d/dx = Direction^-T * (d/di / spacing)`.
    pub fn index_gradient_to_physical(&self, gradient: &Vector<D>) -> Vector<D> {
        self.inverse_direction.transpose() * gradient.component_div(&self.spacing)
    }

    /// Linear buffer offset of a discrete index (axis 0 fastest).
    pub fn offset(&self, index: &[usize; D]) -> usize {
        let mut offset = 0;
        let mut stride = 1;
        for i in 0..D {
            offset += index[i] * stride;
            stride *= self.size[i];
        }
        offset
    }
}
