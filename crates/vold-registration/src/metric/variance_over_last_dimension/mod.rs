//! Variance over the last dimension.
//!
//! Groupwise metric for image sequences: for every spatial sample the fixed
//! point is swept along the last axis, each position is mapped into the
//! moving image and the biased variance of the resulting intensities is
//! taken. The cost is the mean variance over all spatial samples with at
//! least one valid position. A perfectly aligned sequence of identical
//! frames scores zero.

pub mod accumulator;
pub mod config;
pub mod evaluator;
pub mod position_sampler;

pub use accumulator::{CostAggregator, LastDimensionStatistics};
pub use config::{LastDimensionSettings, VarianceOverLastDimensionConfig};
pub use evaluator::{SampleEvaluator, SampleObservations};
pub use position_sampler::sample_random;

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use vold_core::image::ImageGeometry;
use vold_core::{ImageAccessor, ImageMask, Transform};

use super::trait_::Metric;
use crate::error::{RegistrationError, Result};
use crate::policy::{RequiredRatioOfValidSamples, SampleCountPolicy};
use crate::sampler::ImageSample;

/// Spatial samples per work unit. Partials are reduced in chunk order, so
/// the result does not depend on how chunks are scheduled.
const CHUNK_SIZE: usize = 1024;

/// Variance-over-last-dimension metric.
///
/// # Type Parameters
/// * `D` - Image dimensionality; axis `D - 1` is the swept dimension
/// * `T` - Transform from fixed to moving space
/// * `A` - Moving image accessor
pub struct VarianceOverLastDimensionMetric<const D: usize, T, A> {
    fixed: ImageGeometry<D>,
    moving: A,
    transform: T,
    moving_mask: Option<Box<dyn ImageMask<D> + Send + Sync>>,
    policy: Box<dyn SampleCountPolicy>,
    config: VarianceOverLastDimensionConfig,
    settings: LastDimensionSettings,
}

impl<const D: usize, T, A> VarianceOverLastDimensionMetric<D, T, A>
where
    T: Transform<D>,
    A: ImageAccessor<D>,
{
    /// Create a new metric.
    ///
    /// `num_samples_last_dimension` is clamped to the size of the fixed
    /// last dimension.
    pub fn new(
        fixed: ImageGeometry<D>,
        moving: A,
        transform: T,
        config: VarianceOverLastDimensionConfig,
    ) -> Result<Self> {
        let settings = LastDimensionSettings::resolve(&config, fixed.size())?;
        Ok(Self {
            fixed,
            moving,
            transform,
            moving_mask: None,
            policy: Box::new(RequiredRatioOfValidSamples::default()),
            config,
            settings,
        })
    }

    /// Exclude moving-space points outside `mask`.
    pub fn with_moving_mask<M>(mut self, mask: M) -> Self
    where
        M: ImageMask<D> + Send + Sync + 'static,
    {
        self.moving_mask = Some(Box::new(mask));
        self
    }

    /// Replace the default [`RequiredRatioOfValidSamples`] policy.
    pub fn with_sample_count_policy<P>(mut self, policy: P) -> Self
    where
        P: SampleCountPolicy + 'static,
    {
        self.policy = Box::new(policy);
        self
    }

    pub fn config(&self) -> &VarianceOverLastDimensionConfig {
        &self.config
    }

    pub fn fixed_geometry(&self) -> &ImageGeometry<D> {
        &self.fixed
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut T {
        &mut self.transform
    }

    pub fn moving(&self) -> &A {
        &self.moving
    }

    /// Number of fixed grid positions along the last axis.
    pub fn last_dimension_size(&self) -> usize {
        self.settings.last_dim_size
    }

    /// Effective number of random positions per spatial sample.
    pub fn num_samples_last_dimension(&self) -> usize {
        self.settings.num_samples
    }

    /// Random source for one evaluation, per the configured seed.
    fn evaluation_rng(&self) -> StdRng {
        match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None if self.settings.random => StdRng::from_entropy(),
            // Deterministic sweeps never draw.
            None => StdRng::seed_from_u64(0),
        }
    }

    fn evaluate_chunk(
        &self,
        samples: &[ImageSample<D>],
        seed: u64,
        need_derivative: bool,
    ) -> CostAggregator {
        let evaluator = SampleEvaluator {
            fixed: &self.fixed,
            transform: &self.transform,
            moving: &self.moving,
            moving_mask: self.moving_mask.as_deref(),
        };
        let mut aggregator =
            CostAggregator::new(self.transform.number_of_parameters(), need_derivative);
        let mut observations =
            SampleObservations::new(self.transform.number_of_nonzero_jacobian_indices());

        let mut positions: Vec<usize> = (0..self.settings.last_dim_size).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        for sample in samples {
            if self.settings.random {
                sample_random(
                    &mut rng,
                    self.settings.num_samples,
                    self.settings.last_dim_size - 1,
                    &mut positions,
                );
            }
            evaluator.observe(&sample.point, &positions, need_derivative, &mut observations);
            aggregator.add_sample(&observations);
        }
        aggregator
    }
}

impl<const D: usize, T, A> VarianceOverLastDimensionMetric<D, T, A>
where
    T: Transform<D> + Sync,
    A: ImageAccessor<D> + Sync,
{
    fn evaluate<R: Rng>(
        &self,
        samples: &[ImageSample<D>],
        need_derivative: bool,
        rng: &mut R,
    ) -> Result<(f64, Option<DVector<f64>>)> {
        tracing::debug!(
            "evaluating {} over {} spatial samples (random: {}, positions per sample: {}, derivative: {})",
            self.name(),
            samples.len(),
            self.settings.random,
            self.settings.positions_per_sample(),
            need_derivative
        );

        // Seeds are drawn up front, in chunk order, so that threading does
        // not change which positions each chunk visits.
        let work: Vec<(&[ImageSample<D>], u64)> = samples
            .chunks(CHUNK_SIZE)
            .map(|chunk| {
                let seed = if self.settings.random { rng.gen() } else { 0 };
                (chunk, seed)
            })
            .collect();

        let partials: Vec<CostAggregator> = if self.config.use_multithread {
            work.par_iter()
                .map(|&(chunk, seed)| self.evaluate_chunk(chunk, seed, need_derivative))
                .collect()
        } else {
            work.iter()
                .map(|&(chunk, seed)| self.evaluate_chunk(chunk, seed, need_derivative))
                .collect()
        };

        let mut total = CostAggregator::new(self.transform.number_of_parameters(), need_derivative);
        for partial in partials {
            total.merge(partial);
        }
        tracing::debug!(
            "{} of {} spatial samples counted",
            total.counted(),
            total.attempted()
        );
        total.finalize(self.policy.as_ref())
    }

    /// Value using an explicit random source instead of the configured seed.
    pub fn value_with_rng<R: Rng>(
        &self,
        samples: &[ImageSample<D>],
        rng: &mut R,
    ) -> Result<f64> {
        self.evaluate(samples, false, rng).map(|(value, _)| value)
    }

    /// Value and gradient using an explicit random source.
    pub fn value_and_derivative_with_rng<R: Rng>(
        &self,
        samples: &[ImageSample<D>],
        rng: &mut R,
    ) -> Result<(f64, DVector<f64>)> {
        let (value, derivative) = self.evaluate(samples, true, rng)?;
        let derivative = derivative
            .ok_or_else(|| RegistrationError::metric("gradient was not accumulated"))?;
        Ok((value, derivative))
    }
}

impl<const D: usize, T, A> Metric<D> for VarianceOverLastDimensionMetric<D, T, A>
where
    T: Transform<D> + Sync,
    A: ImageAccessor<D> + Sync,
{
    fn number_of_parameters(&self) -> usize {
        self.transform.number_of_parameters()
    }

    fn set_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        self.transform.set_parameters(parameters)?;
        Ok(())
    }

    fn value(&self, samples: &[ImageSample<D>]) -> Result<f64> {
        self.value_with_rng(samples, &mut self.evaluation_rng())
    }

    fn value_and_derivative(&self, samples: &[ImageSample<D>]) -> Result<(f64, DVector<f64>)> {
        self.value_and_derivative_with_rng(samples, &mut self.evaluation_rng())
    }

    fn name(&self) -> &'static str {
        "VarianceOverLastDimension"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vold_core::image::ImageBuffer;
    use vold_core::interpolation::{InterpolatedImage, LinearInterpolator};
    use vold_core::transform::TranslationStackTransform;

    type StackMetric = VarianceOverLastDimensionMetric<
        2,
        TranslationStackTransform<2>,
        InterpolatedImage<2, LinearInterpolator>,
    >;

    /// 6 x 4 sequence whose frames differ by a constant offset.
    fn metric(config: VarianceOverLastDimensionConfig) -> StackMetric {
        let geometry = ImageGeometry::<2>::with_size([6, 4]).unwrap();
        let buffer = ImageBuffer::from_fn(geometry.clone(), |[x, t]| x as f64 + t as f64);
        let moving = InterpolatedImage::new(buffer, LinearInterpolator);
        let transform = TranslationStackTransform::<2>::new(4, 0.0, 1.0).unwrap();
        VarianceOverLastDimensionMetric::new(geometry, moving, transform, config).unwrap()
    }

    fn samples() -> Vec<ImageSample<2>> {
        (0..6)
            .map(|x| ImageSample::new(vold_core::Point::<2>::from([x as f64, 0.0]), 0.0))
            .collect()
    }

    #[test]
    fn test_value_of_offset_frames() {
        let metric = metric(VarianceOverLastDimensionConfig::default());
        // Offsets 0..4 along the last axis: biased variance of {0, 1, 2, 3}.
        let value = metric.value(&samples()).unwrap();
        assert!((value - 1.25).abs() < 1e-12);
        assert_eq!(metric.name(), "VarianceOverLastDimension");
    }

    #[test]
    fn test_clamped_sample_count() {
        let config = VarianceOverLastDimensionConfig::new().with_random_last_dimension_samples(40);
        let metric = metric(config);
        assert_eq!(metric.last_dimension_size(), 4);
        assert_eq!(metric.num_samples_last_dimension(), 4);
    }

    #[test]
    fn test_set_parameters_checks_length() {
        let mut metric = metric(VarianceOverLastDimensionConfig::default());
        assert_eq!(metric.number_of_parameters(), 4);
        assert!(matches!(
            metric.set_parameters(&[0.0; 3]),
            Err(RegistrationError::Core(_))
        ));
    }

    #[test]
    fn test_empty_sample_set_is_insufficient() {
        let metric = metric(VarianceOverLastDimensionConfig::default());
        assert_eq!(
            metric.value(&[]).unwrap_err(),
            RegistrationError::insufficient_samples(0, 0)
        );
    }
}
