//! Image type with physical metadata and coordinate transformations.
//!
//! This module provides the Image struct which represents medical images
//! with tensor data and physical space metadata (origin, spacing, direction).

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use super::buffer::ImageBuffer;
use super::geometry::ImageGeometry;
use crate::error::{CoreError, Result};
use crate::spatial::{Direction, Point, Spacing};

/// Medical image with physical metadata.
///
/// The Image type combines tensor data (potentially on GPU) with physical
/// space metadata that describes how image indices map to physical coordinates.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image, including the last (time) axis
///
/// The tensor is stored slowest axis first: a 2D+t sequence of `T` frames of
/// `H x W` pixels has tensor shape `[T, H, W]` and index size `[W, H, T]`.
///
/// # Examples
/// ```rust
/// use vold_core::Image;
/// use vold_core::spatial::{Direction3, Point3, Spacing3};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([4, 10, 10], &device);
/// let image = Image::new(
///     data,
///     Point3::origin(),
///     Spacing3::repeat(1.0),
///     Direction3::identity(),
/// )
/// .unwrap();
/// assert_eq!(image.size(), [10, 10, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The pixel data, potentially on GPU.
    data: Tensor<B, D>,
    /// Grid size and physical metadata.
    geometry: ImageGeometry<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and metadata.
    ///
    /// # Arguments
    /// * `data` - The image data as a tensor (slowest axis first)
    /// * `origin` - Physical coordinate of the first pixel
    /// * `spacing` - Physical distance between pixels along each index axis
    /// * `direction` - Orientation matrix of the image axes
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Result<Self> {
        let mut size = data.dims();
        size.reverse();
        let geometry = ImageGeometry::new(size, origin, spacing, direction)?;
        Ok(Self { data, geometry })
    }

    /// Upload a CPU buffer into a tensor on `device`.
    pub fn from_buffer(buffer: &ImageBuffer<D>, device: &B::Device) -> Self {
        let geometry = buffer.geometry().clone();
        let values: Vec<f32> = buffer.values().iter().map(|&v| v as f32).collect();
        let data = Tensor::<B, D>::from_data(
            TensorData::new(values, geometry.tensor_shape().to_vec()),
            device,
        );
        Self { data, geometry }
    }

    /// Get the tensor data.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Get the geometry (size and physical metadata).
    pub fn geometry(&self) -> &ImageGeometry<D> {
        &self.geometry
    }

    /// Get the tensor shape (slowest axis first).
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Get the grid size in index-axis order.
    pub fn size(&self) -> [usize; D] {
        self.geometry.size()
    }

    /// Get the origin (physical coordinate of the first pixel).
    pub fn origin(&self) -> &Point<D> {
        self.geometry.origin()
    }

    /// Get the spacing (physical distance between pixels).
    pub fn spacing(&self) -> &Spacing<D> {
        self.geometry.spacing()
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction<D> {
        self.geometry.direction()
    }

    /// Convert a continuous physical point to a continuous index.
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point<D>) -> Point<D> {
        self.geometry.transform_physical_point_to_continuous_index(point)
    }

    /// Convert a continuous index to a physical point.
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        self.geometry.transform_continuous_index_to_physical_point(index)
    }

    /// Read the tensor back into a CPU buffer for point-wise sampling.
    ///
    /// Values are converted to `f64` whatever the backend float type.
    pub fn to_buffer(&self) -> Result<ImageBuffer<D>> {
        let data = self.data.to_data();
        let values: Vec<f64> = data.iter::<f64>().collect();
        if values.len() != self.geometry.number_of_voxels() {
            return Err(CoreError::tensor_data(format!(
                "read {} values from a tensor of shape {:?}",
                values.len(),
                self.shape()
            )));
        }
        tracing::debug!(
            "read back {} voxels from tensor of shape {:?}",
            values.len(),
            self.shape()
        );
        ImageBuffer::new(self.geometry.clone(), values)
    }
}
