use burn::tensor::Tensor;
use burn_ndarray::NdArray;
use proptest::prelude::*;
use vold_core::image::{Image, ImageBuffer, ImageGeometry};
use vold_core::interpolation::{ImageAccessor, InterpolatedImage, LinearInterpolator};
use vold_core::spatial::{Direction, Point, Spacing};

type Backend = NdArray<f32>;
const D: usize = 3;

fn make_rotation(angle_x: f64, angle_y: f64, angle_z: f64) -> Direction<D> {
    let rotation = nalgebra::Rotation3::from_euler_angles(angle_x, angle_y, angle_z);
    *rotation.matrix()
}

proptest! {
    #[test]
    fn test_coordinate_roundtrip(
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        sx in 0.1f64..5.0, sy in 0.1f64..5.0, sz in 0.1f64..5.0,
        ax in -3.14f64..3.14, ay in -3.14f64..3.14, az in -3.14f64..3.14,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let device = Default::default();
        // Use minimal data tensor as we don't access it
        let data = Tensor::<Backend, D>::zeros([2, 2, 2], &device);

        let origin = Point::<D>::from([ox, oy, oz]);
        let spacing = Spacing::<D>::new(sx, sy, sz);
        let direction = make_rotation(ax, ay, az);

        let image = Image::new(data, origin, spacing, direction).unwrap();
        let point = Point::<D>::from([px, py, pz]);

        let index = image.transform_physical_point_to_continuous_index(&point);
        let recovered = image.transform_continuous_index_to_physical_point(&index);

        prop_assert!((point[0] - recovered[0]).abs() < 1e-8, "X mismatch: {} vs {}", point[0], recovered[0]);
        prop_assert!((point[1] - recovered[1]).abs() < 1e-8, "Y mismatch: {} vs {}", point[1], recovered[1]);
        prop_assert!((point[2] - recovered[2]).abs() < 1e-8, "Z mismatch: {} vs {}", point[2], recovered[2]);
    }

    #[test]
    fn test_last_axis_overwrite_roundtrip(
        ox in -10.0f64..10.0, st in 0.5f64..3.0,
        ix in 0.0f64..4.0, iy in 0.0f64..4.0, t in 0usize..5
    ) {
        // Replacing the last index coordinate and mapping back must land on
        // the requested slice exactly enough to address it by rounding.
        let geometry = ImageGeometry::new(
            [5, 5, 5],
            Point::<D>::from([ox, ox, ox]),
            Spacing::<D>::new(1.0, 1.0, st),
            Direction::<D>::identity(),
        ).unwrap();
        let mut index = Point::<D>::from([ix, iy, 0.0]);
        index[D - 1] = t as f64;
        let point = geometry.transform_continuous_index_to_physical_point(&index);
        let back = geometry.transform_physical_point_to_continuous_index(&point);
        prop_assert!((back[D - 1] - t as f64).abs() < 1e-9);
    }

    #[test]
    fn test_linear_physical_derivative_matches_finite_difference(
        ax in -3.0f64..3.0, sx in 0.5f64..2.0, sy in 0.5f64..2.0,
        fx in 0.1f64..0.9, fy in 0.1f64..0.9
    ) {
        let rotation = nalgebra::Rotation2::new(ax);
        let geometry = ImageGeometry::new(
            [6, 6],
            Point::<2>::from([1.0, -2.0]),
            Spacing::<2>::new(sx, sy),
            *rotation.matrix(),
        ).unwrap();
        let buffer = ImageBuffer::from_fn(geometry.clone(), |[x, y]| ((x * x + 3 * y) % 7) as f64);
        let image = InterpolatedImage::new(buffer, LinearInterpolator::new());

        let index = Point::<2>::from([2.0 + fx, 3.0 + fy]);
        let point = geometry.transform_continuous_index_to_physical_point(&index);
        let (_, derivative) = image.evaluate_with_derivative(&point).unwrap();

        let eps = 1e-7;
        for axis in 0..2 {
            let mut forward = point;
            let mut backward = point;
            forward[axis] += eps;
            backward[axis] -= eps;
            let fd = (image.evaluate(&forward).unwrap() - image.evaluate(&backward).unwrap()) / (2.0 * eps);
            prop_assert!((fd - derivative[axis]).abs() < 1e-4, "axis {}: {} vs {}", axis, fd, derivative[axis]);
        }
    }
}
