//! Spatial types for representing points, vectors, spacing, and direction matrices.
//!
//! All types are nalgebra aliases over `f64` so that the full nalgebra API
//! (arithmetic, inversion, indexing) is available on them.

use nalgebra::{Point as NaPoint, SMatrix, SVector};

/// A position in D-dimensional physical or continuous-index space.
pub type Point<const D: usize> = NaPoint<f64, D>;
/// A displacement or derivative in D-dimensional space.
pub type Vector<const D: usize> = SVector<f64, D>;
/// Physical distance between adjacent grid nodes along each index axis.
pub type Spacing<const D: usize> = SVector<f64, D>;
/// Orientation matrix; column `i` is the physical direction of index axis `i`.
pub type Direction<const D: usize> = SMatrix<f64, D, D>;

pub type Point2 = Point<2>;
pub type Point3 = Point<3>;
pub type Point4 = Point<4>;
pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
pub type Vector4 = Vector<4>;
pub type Spacing2 = Spacing<2>;
pub type Spacing3 = Spacing<3>;
pub type Spacing4 = Spacing<4>;
pub type Direction2 = Direction<2>;
pub type Direction3 = Direction<3>;
pub type Direction4 = Direction<4>;
