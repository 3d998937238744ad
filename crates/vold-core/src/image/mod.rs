//! Image types and operations.
//!
//! This module provides the Image type and related functionality
//! for representing medical images with physical metadata.

pub mod buffer;
pub mod geometry;
pub mod grid;
pub mod image;

pub use buffer::ImageBuffer;
pub use geometry::ImageGeometry;
pub use grid::grid_indices;
pub use image::Image;
