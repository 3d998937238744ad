//! Error types for geometry, image and transform operations.

use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The direction matrix cannot be inverted.
    #[error("Singular direction matrix: {0}")]
    SingularDirection(String),

    /// Spacing must be strictly positive and finite along every axis.
    #[error("Invalid spacing: {0}")]
    InvalidSpacing(String),

    /// Wrong number of transform parameters supplied.
    #[error("Parameter count mismatch: expected {expected}, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// Buffer length does not match the image size.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Tensor data could not be read back from the backend.
    #[error("Tensor data error: {0}")]
    TensorData(String),

    /// Invalid construction argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a singular direction error.
    pub fn singular_direction(msg: impl Into<String>) -> Self {
        Self::SingularDirection(msg.into())
    }

    /// Create an invalid spacing error.
    pub fn invalid_spacing(msg: impl Into<String>) -> Self {
        Self::InvalidSpacing(msg.into())
    }

    /// Create a tensor data error.
    pub fn tensor_data(msg: impl Into<String>) -> Self {
        Self::TensorData(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Fail unless `actual` parameters were supplied where `expected` are required.
    pub fn check_parameter_count(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::ParameterCountMismatch { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::singular_direction("det = 0");
        assert_eq!(err.to_string(), "Singular direction matrix: det = 0");
    }

    #[test]
    fn test_parameter_count_check() {
        assert!(CoreError::check_parameter_count(3, 3).is_ok());
        let err = CoreError::check_parameter_count(3, 2).unwrap_err();
        assert_eq!(err, CoreError::ParameterCountMismatch { expected: 3, actual: 2 });
        assert!(err.to_string().contains("expected 3, got 2"));
    }
}
