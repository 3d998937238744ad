//! Transform types and operations.
//!
//! This module provides the parametric transform capability and the
//! transforms shipped with the crate.

pub mod affine;
pub mod stack;
pub mod trait_;
pub mod translation;

pub use affine::AffineTransform;
pub use stack::TranslationStackTransform;
pub use trait_::{Jacobian, Transform};
pub use translation::TranslationTransform;
