//! Acceptance policy for the number of valid samples in an evaluation pass.

use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, Result};

/// Decides whether enough spatial samples produced a measurement.
pub trait SampleCountPolicy: Send + Sync {
    /// `wanted` samples were attempted and `found` were usable.
    fn check(&self, wanted: usize, found: usize) -> Result<()>;
}

/// Require at least `ratio * wanted` usable samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequiredRatioOfValidSamples(pub f64);

impl RequiredRatioOfValidSamples {
    pub const DEFAULT_RATIO: f64 = 0.25;

    pub fn new(ratio: f64) -> Self {
        Self(ratio)
    }

    pub fn ratio(&self) -> f64 {
        self.0
    }
}

impl Default for RequiredRatioOfValidSamples {
    fn default() -> Self {
        Self(Self::DEFAULT_RATIO)
    }
}

impl SampleCountPolicy for RequiredRatioOfValidSamples {
    fn check(&self, wanted: usize, found: usize) -> Result<()> {
        if (found as f64) < wanted as f64 * self.0 {
            return Err(RegistrationError::insufficient_samples(found, wanted));
        }
        Ok(())
    }
}
