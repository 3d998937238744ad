//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation methods must implement.

use crate::image::ImageBuffer;
use crate::spatial::{Point, Vector};

/// Interpolator trait for sampling values at continuous coordinates.
///
/// Interpolators sample image values at non-integer continuous indices,
/// which is essential for image registration and resampling. They return
/// `None` when the index lies outside the buffer, so callers can treat the
/// sample as invalid instead of extrapolating.
pub trait Interpolator {
    /// Interpolate the value at a continuous index.
    fn interpolate<const D: usize>(&self, image: &ImageBuffer<D>, index: &Point<D>) -> Option<f64>;

    /// Interpolate the value and its derivative with respect to the
    /// continuous index coordinates.
    fn interpolate_with_derivative<const D: usize>(
        &self,
        image: &ImageBuffer<D>,
        index: &Point<D>,
    ) -> Option<(f64, Vector<D>)>;
}
