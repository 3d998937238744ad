//! Configuration of the variance-over-last-dimension metric.

use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, Result};

/// User-facing configuration.
///
/// With `sample_last_dimension_randomly` unset every spatial sample is
/// evaluated at all positions of the last dimension and
/// `num_samples_last_dimension` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceOverLastDimensionConfig {
    /// Draw a random subset of last-dimension positions per spatial sample.
    pub sample_last_dimension_randomly: bool,
    /// Size of the random subset; clamped to the last-dimension size.
    pub num_samples_last_dimension: usize,
    /// Seed applied at the start of every evaluation. `None` seeds from OS
    /// entropy, so repeated evaluations draw different subsets.
    pub random_seed: Option<u64>,
    /// Evaluate sample chunks on the rayon thread pool.
    pub use_multithread: bool,
}

impl Default for VarianceOverLastDimensionConfig {
    fn default() -> Self {
        Self {
            sample_last_dimension_randomly: false,
            num_samples_last_dimension: 10,
            random_seed: None,
            use_multithread: false,
        }
    }
}

impl VarianceOverLastDimensionConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample `count` random last-dimension positions per spatial sample.
    pub fn with_random_last_dimension_samples(mut self, count: usize) -> Self {
        self.sample_last_dimension_randomly = true;
        self.num_samples_last_dimension = count;
        self
    }

    /// Make random sampling reproducible.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Enable or disable chunk-parallel evaluation.
    pub fn with_multithread(mut self, enabled: bool) -> Self {
        self.use_multithread = enabled;
        self
    }
}

/// Last-dimension settings resolved against the fixed geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastDimensionSettings {
    /// Index of the last axis (`D - 1`).
    pub last_dim: usize,
    /// Number of grid positions along the last axis.
    pub last_dim_size: usize,
    /// Effective number of random positions, `<= last_dim_size`.
    pub num_samples: usize,
    pub random: bool,
}

impl LastDimensionSettings {
    /// Validate `config` against a fixed grid of the given size.
    pub fn resolve<const D: usize>(
        config: &VarianceOverLastDimensionConfig,
        fixed_size: [usize; D],
    ) -> Result<Self> {
        if D < 2 {
            return Err(RegistrationError::dimension_mismatch(format!(
                "variance over the last dimension needs at least 2 image dimensions, got {}",
                D
            )));
        }
        let last_dim = D - 1;
        let last_dim_size = fixed_size[last_dim];
        if last_dim_size == 0 {
            return Err(RegistrationError::invalid_configuration(
                "fixed image has an empty last dimension",
            ));
        }
        if config.sample_last_dimension_randomly && config.num_samples_last_dimension == 0 {
            return Err(RegistrationError::invalid_configuration(
                "random last dimension sampling needs at least one sample",
            ));
        }

        let num_samples = config.num_samples_last_dimension.min(last_dim_size);
        if num_samples != config.num_samples_last_dimension {
            tracing::debug!(
                "num_samples_last_dimension clamped from {} to {}",
                config.num_samples_last_dimension,
                num_samples
            );
        }

        Ok(Self {
            last_dim,
            last_dim_size,
            num_samples,
            random: config.sample_last_dimension_randomly,
        })
    }

    /// Number of positions visited per spatial sample.
    pub fn positions_per_sample(&self) -> usize {
        if self.random {
            self.num_samples
        } else {
            self.last_dim_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VarianceOverLastDimensionConfig::default();
        assert!(!config.sample_last_dimension_randomly);
        assert_eq!(config.num_samples_last_dimension, 10);
        assert_eq!(config.random_seed, None);
        assert!(!config.use_multithread);
    }

    #[test]
    fn test_clamp_to_last_dimension_size() {
        let config = VarianceOverLastDimensionConfig::new().with_random_last_dimension_samples(50);
        let settings = LastDimensionSettings::resolve(&config, [8, 8, 7]).unwrap();
        assert_eq!(settings.last_dim, 2);
        assert_eq!(settings.last_dim_size, 7);
        assert_eq!(settings.num_samples, 7);
        assert_eq!(settings.positions_per_sample(), 7);
    }

    #[test]
    fn test_deterministic_visits_all_positions() {
        let config = VarianceOverLastDimensionConfig::default();
        let settings = LastDimensionSettings::resolve(&config, [8, 20]).unwrap();
        assert_eq!(settings.num_samples, 10);
        assert_eq!(settings.positions_per_sample(), 20);
    }

    #[test]
    fn test_invalid_settings() {
        let config = VarianceOverLastDimensionConfig::default();
        assert!(matches!(
            LastDimensionSettings::resolve(&config, [8]),
            Err(RegistrationError::DimensionMismatch(_))
        ));
        let zero = VarianceOverLastDimensionConfig::new().with_random_last_dimension_samples(0);
        assert!(LastDimensionSettings::resolve(&zero, [8, 4]).is_err());
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: VarianceOverLastDimensionConfig =
            serde_json::from_str(r#"{ "sample_last_dimension_randomly": true, "random_seed": 7 }"#)
                .unwrap();
        assert!(config.sample_last_dimension_randomly);
        assert_eq!(config.num_samples_last_dimension, 10);
        assert_eq!(config.random_seed, Some(7));

        let json = serde_json::to_string(&config).unwrap();
        let back: VarianceOverLastDimensionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
