//! Metric implementations.

pub mod trait_;
pub mod variance_over_last_dimension;

pub use trait_::Metric;
pub use variance_over_last_dimension::{
    VarianceOverLastDimensionConfig, VarianceOverLastDimensionMetric,
};
