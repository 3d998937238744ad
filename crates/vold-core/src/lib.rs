//! Core types for variance-over-last-dimension registration: image geometry,
//! point-wise interpolation, masks, and parametric transforms with Jacobians.

pub mod error;
pub mod image;
pub mod interpolation;
pub mod mask;
pub mod spatial;
pub mod transform;

pub use error::{CoreError, Result};
pub use image::{Image, ImageBuffer, ImageGeometry};
pub use interpolation::{ImageAccessor, InterpolatedImage};
pub use mask::{BinaryImageMask, ImageMask};
pub use spatial::{Direction, Point, Spacing, Vector};
pub use transform::{Jacobian, Transform};
