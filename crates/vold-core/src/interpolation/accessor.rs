//! Physical-space access to a moving image.

use burn::tensor::backend::Backend;

use super::linear::LinearInterpolator;
use super::trait_::Interpolator;
use crate::error::Result;
use crate::image::{Image, ImageBuffer, ImageGeometry};
use crate::spatial::{Point, Vector};

/// Sample an image at physical points.
///
/// Both methods return `None` when the point cannot be interpolated, e.g.
/// when it maps outside the image buffer.
pub trait ImageAccessor<const D: usize> {
    /// Intensity at a physical point.
    fn evaluate(&self, point: &Point<D>) -> Option<f64>;

    /// Intensity and its spatial derivative with respect to the physical
    /// coordinates of `point`.
    fn evaluate_with_derivative(&self, point: &Point<D>) -> Option<(f64, Vector<D>)>;
}

/// An [`ImageBuffer`] paired with an interpolator.
#[derive(Debug, Clone)]
pub struct InterpolatedImage<const D: usize, I = LinearInterpolator> {
    buffer: ImageBuffer<D>,
    interpolator: I,
}

impl<const D: usize, I: Interpolator> InterpolatedImage<D, I> {
    pub fn new(buffer: ImageBuffer<D>, interpolator: I) -> Self {
        Self { buffer, interpolator }
    }

    /// Read `image` back from its backend and wrap it for sampling.
    pub fn from_image<B: Backend>(image: &Image<B, D>, interpolator: I) -> Result<Self> {
        Ok(Self::new(image.to_buffer()?, interpolator))
    }

    pub fn buffer(&self) -> &ImageBuffer<D> {
        &self.buffer
    }

    pub fn geometry(&self) -> &ImageGeometry<D> {
        self.buffer.geometry()
    }
}

impl<const D: usize, I: Interpolator> ImageAccessor<D> for InterpolatedImage<D, I> {
    fn evaluate(&self, point: &Point<D>) -> Option<f64> {
        let index = self.geometry().transform_physical_point_to_continuous_index(point);
        self.interpolator.interpolate(&self.buffer, &index)
    }

    fn evaluate_with_derivative(&self, point: &Point<D>) -> Option<(f64, Vector<D>)> {
        let geometry = self.geometry();
        let index = geometry.transform_physical_point_to_continuous_index(point);
        self.interpolator
            .interpolate_with_derivative(&self.buffer, &index)
            .map(|(value, gradient)| (value, geometry.index_gradient_to_physical(&gradient)))
    }
}
