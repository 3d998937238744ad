//! Per-sample evaluation along the last dimension.
//!
//! For one fixed-space point the evaluator visits a set of last-dimension
//! positions, maps each through the transform and records the moving
//! intensity plus, in derivative mode, the per-parameter contribution
//! `dM/dmu` at the transform's nonzero Jacobian indices.

use vold_core::image::ImageGeometry;
use vold_core::spatial::Point;
use vold_core::{ImageAccessor, ImageMask, Jacobian, Transform};

/// Observations of one spatial sample, one slot per visited position.
///
/// Buffers are reused between samples; every call to
/// [`SampleEvaluator::observe`] overwrites them. Invalid positions keep their
/// slot with a zero value, zero contributions and all-zero indices.
#[derive(Debug, Clone)]
pub struct SampleObservations {
    values: Vec<f64>,
    valid: Vec<bool>,
    /// Row-major `[position, k]`, `k < nonzero_count`.
    contributions: Vec<f64>,
    /// Parameter index of each contribution, same layout.
    nonzero_indices: Vec<usize>,
    nonzero_count: usize,
    jacobian: Jacobian,
    jacobian_indices: Vec<usize>,
}

impl SampleObservations {
    pub fn new(nonzero_count: usize) -> Self {
        Self {
            values: Vec::new(),
            valid: Vec::new(),
            contributions: Vec::new(),
            nonzero_indices: Vec::new(),
            nonzero_count,
            jacobian: Jacobian::zeros(0, 0),
            jacobian_indices: Vec::new(),
        }
    }

    fn reset(&mut self, positions: usize, with_derivative: bool) {
        self.values.clear();
        self.values.resize(positions, 0.0);
        self.valid.clear();
        self.valid.resize(positions, false);
        let derivative_len = if with_derivative {
            positions * self.nonzero_count
        } else {
            0
        };
        self.contributions.clear();
        self.contributions.resize(derivative_len, 0.0);
        self.nonzero_indices.clear();
        self.nonzero_indices.resize(derivative_len, 0);
    }

    /// Number of visited positions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, position: usize) -> f64 {
        self.values[position]
    }

    pub fn is_valid(&self, position: usize) -> bool {
        self.valid[position]
    }

    pub fn nonzero_count(&self) -> usize {
        self.nonzero_count
    }

    /// `(parameter index, dM/dmu)` pairs of one position.
    pub fn contributions(&self, position: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = position * self.nonzero_count;
        let end = start + self.nonzero_count;
        self.nonzero_indices[start..end]
            .iter()
            .copied()
            .zip(self.contributions[start..end].iter().copied())
    }

    /// Record values directly, bypassing the evaluator.
    ///
    /// `contributions[d]` and `indices[d]` hold the nonzero-index data of
    /// position `d`; pass empty slices for value-only observations.
    #[cfg(test)]
    pub(crate) fn record(
        &mut self,
        values: &[Option<f64>],
        contributions: &[Vec<f64>],
        indices: &[Vec<usize>],
    ) {
        let with_derivative = !contributions.is_empty();
        if with_derivative {
            assert_eq!(contributions.len(), values.len());
            assert_eq!(indices.len(), values.len());
        }
        self.reset(values.len(), with_derivative);
        for (position, value) in values.iter().enumerate() {
            if let Some(v) = value {
                self.values[position] = *v;
                self.valid[position] = true;
                if with_derivative {
                    let start = position * self.nonzero_count;
                    for k in 0..self.nonzero_count {
                        self.contributions[start + k] = contributions[position][k];
                        self.nonzero_indices[start + k] = indices[position][k];
                    }
                }
            }
        }
    }
}

/// Maps one fixed point along the last dimension into the moving image.
pub struct SampleEvaluator<'a, const D: usize, T, A> {
    pub fixed: &'a ImageGeometry<D>,
    pub transform: &'a T,
    pub moving: &'a A,
    pub moving_mask: Option<&'a (dyn ImageMask<D> + Send + Sync)>,
}

impl<'a, const D: usize, T, A> SampleEvaluator<'a, D, T, A>
where
    T: Transform<D>,
    A: ImageAccessor<D>,
{
    /// Observe `point` at the given last-dimension `positions`.
    pub fn observe(
        &self,
        point: &Point<D>,
        positions: &[usize],
        need_derivative: bool,
        observations: &mut SampleObservations,
    ) {
        observations.reset(positions.len(), need_derivative);
        let last_dim = D - 1;
        let mut index = self.fixed.transform_physical_point_to_continuous_index(point);

        for (slot, &position) in positions.iter().enumerate() {
            index[last_dim] = position as f64;
            let fixed_point = self.fixed.transform_continuous_index_to_physical_point(&index);

            let Some(mapped) = self.transform.transform_point(&fixed_point) else {
                continue;
            };
            if let Some(mask) = self.moving_mask {
                if !mask.is_inside(&mapped) {
                    continue;
                }
            }

            if !need_derivative {
                if let Some(value) = self.moving.evaluate(&mapped) {
                    observations.values[slot] = value;
                    observations.valid[slot] = true;
                }
                continue;
            }

            let Some((value, gradient)) = self.moving.evaluate_with_derivative(&mapped) else {
                continue;
            };
            observations.values[slot] = value;
            observations.valid[slot] = true;

            self.transform.evaluate_jacobian(
                &fixed_point,
                &mut observations.jacobian,
                &mut observations.jacobian_indices,
            );
            let nonzero_count = observations.nonzero_count;
            debug_assert_eq!(
                (observations.jacobian.nrows(), observations.jacobian.ncols()),
                (D, nonzero_count),
                "transform returned a Jacobian of the wrong shape"
            );
            debug_assert_eq!(observations.jacobian_indices.len(), nonzero_count);
            let start = slot * nonzero_count;
            let columns = observations
                .jacobian
                .ncols()
                .min(nonzero_count)
                .min(observations.jacobian_indices.len());
            for k in 0..columns {
                let mut contribution = 0.0;
                for axis in 0..D {
                    contribution += observations.jacobian[(axis, k)] * gradient[axis];
                }
                observations.contributions[start + k] = contribution;
                observations.nonzero_indices[start + k] = observations.jacobian_indices[k];
            }
        }
    }
}
