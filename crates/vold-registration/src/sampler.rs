//! Fixed-image sample containers.
//!
//! Metrics consume a slice of [`ImageSample`]s produced by an
//! [`ImageSampler`] before every evaluation. Choosing the sample points is the
//! sampler's business; [`GridSampler`] is a regular-grid reference sampler.

use vold_core::image::{grid_indices, ImageBuffer};
use vold_core::spatial::Point;

use crate::error::{RegistrationError, Result};

/// One fixed-image sample: a physical point and the fixed intensity there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSample<const D: usize> {
    pub point: Point<D>,
    pub value: f64,
}

impl<const D: usize> ImageSample<D> {
    pub fn new(point: Point<D>, value: f64) -> Self {
        Self { point, value }
    }
}

/// Produces a fresh sample container for each evaluation.
pub trait ImageSampler<const D: usize> {
    fn update(&mut self) -> Result<Vec<ImageSample<D>>>;
}

/// Samples every `step[i]`-th grid node along each axis of the fixed image.
#[derive(Debug, Clone)]
pub struct GridSampler<const D: usize> {
    fixed: ImageBuffer<D>,
    step: [usize; D],
}

impl<const D: usize> GridSampler<D> {
    /// Sample every voxel.
    pub fn new(fixed: ImageBuffer<D>) -> Self {
        Self {
            fixed,
            step: [1; D],
        }
    }

    /// Sample every `step[i]`-th voxel along axis `i`. Zero steps are rejected.
    pub fn with_step(mut self, step: [usize; D]) -> Result<Self> {
        if step.contains(&0) {
            return Err(RegistrationError::invalid_configuration(format!(
                "grid sampler step must be positive, got {:?}",
                step
            )));
        }
        self.step = step;
        Ok(self)
    }

    /// Sample only the first slice of the last axis. Metrics that scan the
    /// last axis themselves gain nothing from the other slices.
    pub fn with_last_dimension_collapsed(mut self) -> Self {
        if D > 0 {
            self.step[D - 1] = self.fixed.geometry().size()[D - 1];
        }
        self
    }

    pub fn samples(&self) -> Vec<ImageSample<D>> {
        let geometry = self.fixed.geometry();
        let reduced: [usize; D] =
            std::array::from_fn(|axis| geometry.size()[axis].div_ceil(self.step[axis]));
        grid_indices(reduced)
            .map(|reduced_index| {
                let index: [usize; D] =
                    std::array::from_fn(|axis| reduced_index[axis] * self.step[axis]);
                ImageSample::new(
                    geometry.transform_index_to_physical_point(&index),
                    self.fixed.value_at(&index),
                )
            })
            .collect()
    }
}

impl<const D: usize> ImageSampler<D> for GridSampler<D> {
    fn update(&mut self) -> Result<Vec<ImageSample<D>>> {
        Ok(self.samples())
    }
}
