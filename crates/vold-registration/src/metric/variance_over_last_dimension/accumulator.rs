//! Running totals of the variance-over-last-dimension cost.

use nalgebra::DVector;

use super::evaluator::SampleObservations;
use crate::error::{RegistrationError, Result};
use crate::policy::SampleCountPolicy;

/// Moments of the valid values of one spatial sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LastDimensionStatistics {
    pub sum: f64,
    pub sum_of_squares: f64,
    pub count: usize,
}

impl LastDimensionStatistics {
    /// Moments of the valid slots of `observations`, in slot order.
    pub fn from_observations(observations: &SampleObservations) -> Self {
        let mut statistics = Self::default();
        for position in 0..observations.len() {
            if observations.is_valid(position) {
                statistics.push(observations.value(position));
            }
        }
        statistics
    }

    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.sum_of_squares += value * value;
        self.count += 1;
    }

    /// Mean of the pushed values, `None` when nothing was pushed.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Biased variance `E[v^2] - E[v]^2`. Not clamped, so round-off may
    /// leave it marginally negative for constant sequences.
    pub fn variance(&self) -> Option<f64> {
        self.mean()
            .map(|mean| self.sum_of_squares / self.count as f64 - mean * mean)
    }
}

/// Partial or total cost over a set of spatial samples.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAggregator {
    measure: f64,
    derivative: Option<DVector<f64>>,
    counted: usize,
    attempted: usize,
}

impl CostAggregator {
    /// Empty totals; `derivative` allocates a zeroed gradient of
    /// `number_of_parameters` entries.
    pub fn new(number_of_parameters: usize, derivative: bool) -> Self {
        Self {
            measure: 0.0,
            derivative: derivative.then(|| DVector::zeros(number_of_parameters)),
            counted: 0,
            attempted: 0,
        }
    }

    pub fn measure(&self) -> f64 {
        self.measure
    }

    pub fn derivative(&self) -> Option<&DVector<f64>> {
        self.derivative.as_ref()
    }

    /// Spatial samples with at least one valid position.
    pub fn counted(&self) -> usize {
        self.counted
    }

    /// Spatial samples visited.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Add the variance of one spatial sample and, when a gradient is being
    /// accumulated, `2 (v_d - mu) dM_d/dmu_j / k` at every nonzero index.
    pub fn add_sample(&mut self, observations: &SampleObservations) {
        self.attempted += 1;
        let statistics = LastDimensionStatistics::from_observations(observations);
        let (Some(mean), Some(variance)) = (statistics.mean(), statistics.variance()) else {
            return;
        };
        self.measure += variance;
        self.counted += 1;

        if let Some(derivative) = self.derivative.as_mut() {
            let scale = 2.0 / statistics.count as f64;
            for position in 0..observations.len() {
                if !observations.is_valid(position) {
                    continue;
                }
                let deviation = observations.value(position) - mean;
                for (index, contribution) in observations.contributions(position) {
                    derivative[index] += scale * deviation * contribution;
                }
            }
        }
    }

    /// Fold a later partial into this one.
    pub fn merge(&mut self, other: CostAggregator) {
        self.measure += other.measure;
        self.counted += other.counted;
        self.attempted += other.attempted;
        if let (Some(total), Some(partial)) = (self.derivative.as_mut(), other.derivative) {
            *total += partial;
        }
    }

    /// Check the sample counts against `policy` and normalize by the number
    /// of counted samples.
    pub fn finalize(self, policy: &dyn SampleCountPolicy) -> Result<(f64, Option<DVector<f64>>)> {
        if let Err(err) = policy.check(self.attempted, self.counted) {
            tracing::warn!(
                "sample count policy rejected evaluation: {} of {} samples usable",
                self.counted,
                self.attempted
            );
            return Err(err);
        }
        if self.counted == 0 {
            return Err(RegistrationError::insufficient_samples(0, self.attempted));
        }

        let denominator = self.counted as f64;
        let derivative = self.derivative.map(|derivative| derivative / denominator);
        Ok((self.measure / denominator, derivative))
    }
}
