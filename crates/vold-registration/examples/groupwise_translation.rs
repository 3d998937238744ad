//! Groupwise Translation Example
//!
//! Aligns the frames of a synthetic 2D+t sequence by minimizing the variance
//! over the last dimension with plain gradient descent:
//!
//! 1. Build a sequence of Gaussian blobs with a known drift per frame
//! 2. Create a translation stack transform (one translation per frame)
//! 3. Set up the variance-over-last-dimension metric
//! 4. Run gradient descent with step halving
//! 5. Compare the recovered shifts with the known drift
//!
//! Usage:
//!   RUST_LOG=info cargo run --example groupwise_translation

use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use tracing_subscriber::EnvFilter;
use vold_core::image::Image;
use vold_core::interpolation::{InterpolatedImage, LinearInterpolator};
use vold_core::spatial::{Direction3, Point3, Spacing3};
use vold_core::transform::TranslationStackTransform;
use vold_registration::metric::{Metric, VarianceOverLastDimensionConfig, VarianceOverLastDimensionMetric};
use vold_registration::sampler::{GridSampler, ImageSampler};

type Backend = NdArray<f32>;

const SIZE: usize = 48;
const SIGMA: f32 = 5.0;
const DRIFT: [(f32, f32); 6] = [
    (0.0, 0.0),
    (1.2, -0.6),
    (2.1, -0.9),
    (2.6, 0.4),
    (1.7, 1.5),
    (0.5, 2.2),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let device = Default::default();
    let frames = DRIFT.len();

    // =======================================================================
    // Step 1: Synthetic sequence
    // =======================================================================
    let center = SIZE as f32 / 2.0;
    let mut data_vec = Vec::with_capacity(SIZE * SIZE * frames);
    for (dx, dy) in DRIFT {
        for y in 0..SIZE {
            for x in 0..SIZE {
                let rx = x as f32 - center - dx;
                let ry = y as f32 - center - dy;
                data_vec.push((-(rx * rx + ry * ry) / (2.0 * SIGMA * SIGMA)).exp());
            }
        }
    }
    let data = Tensor::<Backend, 3>::from_data(
        TensorData::new(data_vec, [frames, SIZE, SIZE]),
        &device,
    );
    let image = Image::new(
        data,
        Point3::origin(),
        Spacing3::repeat(1.0),
        Direction3::identity(),
    )?;
    tracing::info!("sequence size {:?}", image.size());

    // =======================================================================
    // Step 2-3: Transform and metric
    // =======================================================================
    let transform = TranslationStackTransform::<3>::new(frames, 0.0, 1.0)?;
    let moving = InterpolatedImage::from_image(&image, LinearInterpolator)?;
    let config = VarianceOverLastDimensionConfig::new().with_multithread(true);
    let mut metric =
        VarianceOverLastDimensionMetric::new(image.geometry().clone(), moving, transform, config)?;

    let mut sampler = GridSampler::new(image.to_buffer()?)
        .with_step([2, 2, 1])?
        .with_last_dimension_collapsed();
    let samples = sampler.update()?;
    tracing::info!("{} spatial samples", samples.len());

    // =======================================================================
    // Step 4: Gradient descent
    // =======================================================================
    let mut parameters = vec![0.0; metric.number_of_parameters()];
    let (mut value, mut gradient) = metric.get_value_and_derivative(&parameters, &samples)?;
    let initial = value;
    let mut step = 200.0;

    for iteration in 0..200 {
        let candidate: Vec<f64> = parameters
            .iter()
            .zip(gradient.iter())
            .map(|(p, g)| p - step * g)
            .collect();
        let (candidate_value, candidate_gradient) =
            metric.get_value_and_derivative(&candidate, &samples)?;

        if candidate_value < value {
            parameters = candidate;
            value = candidate_value;
            gradient = candidate_gradient;
        } else {
            step *= 0.5;
            if step < 1e-3 {
                break;
            }
        }
        if iteration % 20 == 0 {
            tracing::info!("iteration {:3}: cost {:.6e} (step {})", iteration, value, step);
        }
    }

    // =======================================================================
    // Step 5: Results
    // =======================================================================
    println!("Cost: {:.6e} -> {:.6e}", initial, value);
    println!("frame   drift (x, y)      recovered (x, y)");
    let reference = (parameters[0], parameters[1]);
    for (frame, (dx, dy)) in DRIFT.iter().enumerate() {
        let rx = parameters[2 * frame] - reference.0;
        let ry = parameters[2 * frame + 1] - reference.1;
        println!(
            "{:5}   ({:5.2}, {:5.2})    ({:5.2}, {:5.2})",
            frame, dx, dy, rx, ry
        );
    }

    Ok(())
}
