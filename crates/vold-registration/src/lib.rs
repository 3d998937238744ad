//! Registration metrics for image sequences.
//!
//! The central type is [`VarianceOverLastDimensionMetric`], a groupwise cost
//! that measures how much intensities vary along the last image axis once
//! every frame has been mapped through a parametric transform.

pub mod error;
pub mod metric;
pub mod policy;
pub mod sampler;

pub use error::{RegistrationError, Result};
pub use metric::{Metric, VarianceOverLastDimensionConfig, VarianceOverLastDimensionMetric};
pub use policy::{RequiredRatioOfValidSamples, SampleCountPolicy};
pub use sampler::{GridSampler, ImageSample, ImageSampler};
