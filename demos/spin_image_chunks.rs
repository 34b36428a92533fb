//! Spin Image Chunks Example
//!
//! Builds a synthetic wavy surface with analytic normals, splits it into
//! index-range chunks, and prints the spin image of one reference point per
//! chunk as a character heatmap.
//!
//! Usage:
//!   cargo run --bin spin_image_chunks
//!   cargo run --bin spin_image_chunks -- --resolution 32 --bin-size 0.02
//!   cargo run --bin spin_image_chunks -- --config spin_image.toml

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use spincrate_algorithms::{
    split_into_chunks, SpinImageBuilder, SpinImageConfig, DEFAULT_CHUNK_REFERENCE,
};
use spincrate_core::{OrientedPoint, OrientedPointCloud, Point3d, SpinImage, Vector3d};
use std::time::Instant;

/// Heatmap characters, from empty to full
const SHADES: &[u8] = b" .:-=+*#%@";

/// Compute spin images for chunks of a synthetic surface
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with spin image parameters; flags below override it
    #[arg(short, long)]
    config: Option<String>,

    /// Bins per image axis
    #[arg(long)]
    resolution: Option<usize>,

    /// Bin edge length
    #[arg(long)]
    bin_size: Option<f64>,

    /// Support angle in degrees
    #[arg(long)]
    support_angle_deg: Option<f64>,

    /// Neighborhood radius used when selecting chunks (informational)
    #[arg(long)]
    support_radius: Option<f64>,

    /// Surface grid columns
    #[arg(long, default_value_t = 100)]
    columns: usize,

    /// Surface grid rows
    #[arg(long, default_value_t = 80)]
    rows: usize,

    /// Points per chunk
    #[arg(long, default_value_t = 2500)]
    chunk_size: usize,

    /// Position of the reference point inside each chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_REFERENCE)]
    reference: usize,

    /// Uniform position jitter added to every sample
    #[arg(long, default_value_t = 0.0005)]
    noise: f64,

    /// Random seed for the jitter
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Downsample the printed heatmap to at most this many columns
    #[arg(long, default_value_t = 40)]
    max_width: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let builder = SpinImageBuilder::new(config).context("invalid spin image configuration")?;

    println!("Spin Image Chunks Example");
    println!("=========================");
    println!(
        "resolution {} | bin size {} | support angle {:.1} deg | support radius {}",
        config.resolution,
        config.bin_size,
        config.support_angle.to_degrees(),
        config.support_radius
    );

    let cloud = wavy_surface(args.columns, args.rows, args.noise, args.seed);
    println!("Created surface with {} oriented points", cloud.len());

    let chunks = split_into_chunks(cloud.len(), args.chunk_size, args.reference)?;
    info!("Split cloud into {} chunks of up to {} points", chunks.len(), args.chunk_size);

    for (idx, chunk) in chunks.iter().enumerate() {
        let (reference, neighbors) = chunk.select(&cloud)?;

        let start = Instant::now();
        let (image, stats) = builder.build_with_stats(&reference, &neighbors.as_neighbor_set())?;
        let elapsed = start.elapsed();

        println!(
            "\nChunk {} ({} points, reference cloud index {})",
            idx + 1,
            chunk.len(),
            chunk.reference_index()?
        );
        println!(
            "  {} contributed, {} outside support angle, {} out of bounds, built in {:?}",
            stats.contributed, stats.rejected_by_angle, stats.out_of_bounds, elapsed
        );
        println!("  total weight {:.3}, peak bin {:.3}", image.total_weight(), image.max_value());
        print_heatmap(&image, args.max_width);
    }

    if chunks.len() > 1 {
        let references: Vec<OrientedPoint> = chunks
            .iter()
            .map(|chunk| chunk.reference_index().map(|i| cloud[i]))
            .collect::<spincrate_core::Result<_>>()?;
        let neighbors = cloud.to_neighbor_set();
        let images = builder.build_batch(&references, &neighbors.as_neighbor_set())?;

        println!("\nCorrelation between whole-cloud spin images of the chunk references");
        for (i, a) in images.iter().enumerate() {
            let row: Vec<String> = images
                .iter()
                .map(|b| a.correlation(b).map(|r| format!("{:6.3}", r)))
                .collect::<spincrate_core::Result<_>>()?;
            println!("  {:>2}: {}", i + 1, row.join(" "));
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<SpinImageConfig> {
    let mut config = match &args.config {
        Some(path) => SpinImageConfig::from_toml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => SpinImageConfig::default(),
    };

    if let Some(resolution) = args.resolution {
        config = config.with_resolution(resolution);
    }
    if let Some(bin_size) = args.bin_size {
        config = config.with_bin_size(bin_size);
    }
    if let Some(degrees) = args.support_angle_deg {
        config = config.with_support_angle_degrees(degrees);
    }
    if let Some(radius) = args.support_radius {
        config = config.with_support_radius(radius);
    }

    Ok(config)
}

/// Row-major grid over `z = A sin(kx) cos(ky)` with analytic normals
fn wavy_surface(columns: usize, rows: usize, noise: f64, seed: u64) -> OrientedPointCloud {
    const SPACING: f64 = 0.005;
    const AMPLITUDE: f64 = 0.03;
    const FREQUENCY: f64 = 12.0;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut jitter = move || if noise > 0.0 { rng.gen_range(-noise..noise) } else { 0.0 };

    let mut cloud = OrientedPointCloud::with_capacity(columns * rows);
    for r in 0..rows {
        for c in 0..columns {
            let x = c as f64 * SPACING;
            let y = r as f64 * SPACING;
            let z = AMPLITUDE * (FREQUENCY * x).sin() * (FREQUENCY * y).cos();

            let dz_dx = AMPLITUDE * FREQUENCY * (FREQUENCY * x).cos() * (FREQUENCY * y).cos();
            let dz_dy = -AMPLITUDE * FREQUENCY * (FREQUENCY * x).sin() * (FREQUENCY * y).sin();
            let normal = Vector3d::new(-dz_dx, -dz_dy, 1.0).normalize();

            let position = Point3d::new(x + jitter(), y + jitter(), z + jitter());
            cloud.push(OrientedPoint::new(position, normal));
        }
    }
    cloud
}

/// Print the image with one character per (possibly merged) bin
fn print_heatmap(image: &SpinImage, max_width: usize) {
    let resolution = image.resolution();
    let step = resolution.div_ceil(max_width.max(1)).max(1);
    let peak = image.max_value();
    let grid = image.as_array();

    for row in (0..resolution).step_by(step) {
        let line: String = (0..resolution)
            .step_by(step)
            .map(|col| {
                let mut value: f64 = 0.0;
                for r in row..(row + step).min(resolution) {
                    for c in col..(col + step).min(resolution) {
                        value = value.max(grid[(r, c)]);
                    }
                }
                shade(value, peak)
            })
            .collect();
        println!("  |{}|", line);
    }
}

fn shade(value: f64, peak: f64) -> char {
    if peak <= 0.0 || value <= 0.0 {
        return SHADES[0] as char;
    }
    let level = ((value / peak) * (SHADES.len() - 1) as f64).ceil() as usize;
    SHADES[level.min(SHADES.len() - 1)] as char
}
