//! Error types for registration operations.
//!
//! This module provides structured error types for metric evaluation,
//! enabling callers (typically an optimizer) to decide how to react.

use thiserror::Error;
use vold_core::CoreError;

/// Main error type for registration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    /// Error in metric computation.
    #[error("Metric error: {0}")]
    MetricError(String),

    /// Too few spatial samples produced a usable measurement.
    #[error("Too many samples map outside moving image buffer: {found} / {wanted}")]
    InsufficientSamples { found: usize, wanted: usize },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Dimension mismatch.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error raised by geometry, image or transform code.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create a metric error.
    pub fn metric(msg: impl Into<String>) -> Self {
        Self::MetricError(msg.into())
    }

    /// Create an insufficient samples error.
    pub fn insufficient_samples(found: usize, wanted: usize) -> Self {
        Self::InsufficientSamples { found, wanted }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }
}
