//! Spin image computation
//!
//! A spin image describes the surface around an oriented point `O` with
//! normal `n` by expressing every neighbor `x` in cylindrical coordinates
//! about the line through `O` along `n`:
//!
//! * `β = n · (x - O)`, the signed height along the normal,
//! * `α = sqrt(|x - O|² - β²)`, the distance from the normal line.
//!
//! Each neighbor whose normal lies within the support angle of `n` then
//! deposits unit weight into the `(β, α)` histogram with bilinear
//! interpolation across four bins. Because neither coordinate depends on
//! the direction around the normal, the image is invariant to rotation about
//! `n`.

use crate::config::SpinImageConfig;
use log::{debug, info, warn};
use rayon::prelude::*;
use spincrate_core::{
    Error, NeighborSet, OrientedPoint, OrientedPointCloud, Point3d, Result, SpinImage,
};

/// Tolerance on `|n| - 1` before a reference normal is reported as non-unit
const UNIT_NORMAL_TOLERANCE: f64 = 1e-3;

/// Counts gathered while accumulating one spin image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpinImageStats {
    /// Number of neighbors examined
    pub total: usize,
    /// Neighbors skipped because their normal exceeds the support angle
    pub rejected_by_angle: usize,
    /// Neighbors whose bin fell outside the image
    pub out_of_bounds: usize,
    /// Neighbors that deposited weight into the image
    pub contributed: usize,
}

/// Fractional bin position of a neighbor inside the image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinPosition {
    /// Top-left row of the 2×2 interpolation cell
    pub row: usize,
    /// Top-left column of the 2×2 interpolation cell
    pub col: usize,
    /// Fractional offset along the α axis, in `[0, 1)`
    pub alpha_frac: f64,
    /// Fractional offset along the β axis, in `[0, 1)`
    pub beta_frac: f64,
}

/// Cylindrical `(α, β)` coordinates of `point` relative to `reference`.
///
/// `α` is clamped at zero so rounding never produces NaN when the point lies
/// on the normal line.
pub fn spin_coordinates(reference: &OrientedPoint, point: &Point3d) -> (f64, f64) {
    let d = point - reference.position;
    let beta = reference.normal.dot(&d);
    let alpha = (d.norm_squared() - beta * beta).max(0.0).sqrt();
    (alpha, beta)
}

/// Computes spin images for a fixed configuration.
///
/// The builder holds only its validated configuration, so one instance can
/// be shared across threads and reused for any number of reference points.
///
/// # Example
/// ```rust
/// use spincrate_algorithms::{SpinImageBuilder, SpinImageConfig};
/// use spincrate_core::{NeighborSet, OrientedPoint, Point3d, Vector3d};
///
/// fn main() -> spincrate_core::Result<()> {
///     let config = SpinImageConfig::default()
///         .with_resolution(4)
///         .with_bin_size(1.0)
///         .with_support_angle(std::f64::consts::PI);
///     let builder = SpinImageBuilder::new(config)?;
///
///     let reference = OrientedPoint::new(Point3d::origin(), Vector3d::z());
///     let positions = vec![Point3d::new(0.0, 0.0, 1.0)];
///     let normals = vec![Vector3d::z()];
///
///     let image = builder.build(&reference, &NeighborSet::new(&positions, &normals))?;
///     assert_eq!(image.get(1, 0), Some(1.0));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SpinImageBuilder {
    config: SpinImageConfig,
    cos_threshold: f64,
}

impl SpinImageBuilder {
    /// Validate `config` and create a builder for it
    pub fn new(config: SpinImageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cos_threshold: config.cos_threshold(),
        })
    }

    /// The validated configuration this builder was created with
    pub fn config(&self) -> &SpinImageConfig {
        &self.config
    }

    /// Map cylindrical coordinates to a bin cell.
    ///
    /// Returns `None` when the 2×2 cell would extend past the image: the last
    /// row and column are only ever reached as the far side of a cell. Non
    /// finite coordinates are also rejected here.
    pub fn bin_position(&self, alpha: f64, beta: f64) -> Option<BinPosition> {
        let resolution = self.config.resolution;
        let bin_size = self.config.bin_size;
        let limit = (resolution - 1) as f64;

        let row_f = resolution as f64 / 2.0 - beta / bin_size;
        let col_f = alpha / bin_size;
        let row = row_f.floor();
        let col = col_f.floor();

        if !(row >= 0.0 && row < limit && col >= 0.0 && col < limit) {
            return None;
        }

        Some(BinPosition {
            row: row as usize,
            col: col as usize,
            alpha_frac: col_f - col,
            beta_frac: row_f - row,
        })
    }

    /// Compute the spin image of `reference` over `neighbors`
    pub fn build(
        &self,
        reference: &OrientedPoint,
        neighbors: &NeighborSet<'_>,
    ) -> Result<SpinImage> {
        self.build_with_stats(reference, neighbors).map(|(image, _)| image)
    }

    /// Compute the spin image and report how many neighbors were used or skipped
    pub fn build_with_stats(
        &self,
        reference: &OrientedPoint,
        neighbors: &NeighborSet<'_>,
    ) -> Result<(SpinImage, SpinImageStats)> {
        let total = neighbors.validate()?;
        check_reference(reference)?;

        let mut image = SpinImage::zeros(self.config.resolution);
        let mut stats = SpinImageStats {
            total,
            ..SpinImageStats::default()
        };

        let mut grid = image.as_array_mut();
        for (position, normal) in neighbors.iter() {
            // Unit normals can round to a dot product just outside [-1, 1]
            if reference.normal.dot(normal).clamp(-1.0, 1.0) < self.cos_threshold {
                stats.rejected_by_angle += 1;
                continue;
            }

            let (alpha, beta) = spin_coordinates(reference, position);
            let Some(BinPosition {
                row,
                col,
                alpha_frac: a,
                beta_frac: b,
            }) = self.bin_position(alpha, beta)
            else {
                stats.out_of_bounds += 1;
                continue;
            };

            grid[(row, col)] += (1.0 - a) * (1.0 - b);
            grid[(row + 1, col)] += a * (1.0 - b);
            grid[(row, col + 1)] += (1.0 - a) * b;
            grid[(row + 1, col + 1)] += a * b;
            stats.contributed += 1;
        }

        debug!(
            "Spin image built: {} of {} neighbors contributed \
             ({} outside support angle, {} out of bounds)",
            stats.contributed, stats.total, stats.rejected_by_angle, stats.out_of_bounds
        );

        Ok((image, stats))
    }

    /// Compute one spin image per reference point against a shared neighbor set.
    ///
    /// References are processed in parallel. The output is in the same order
    /// as `references`.
    pub fn build_batch(
        &self,
        references: &[OrientedPoint],
        neighbors: &NeighborSet<'_>,
    ) -> Result<Vec<SpinImage>> {
        let count = neighbors.validate()?;
        for reference in references {
            check_reference(reference)?;
        }

        info!(
            "Computing {} spin images ({}x{}) over {} neighbors",
            references.len(),
            self.config.resolution,
            self.config.resolution,
            count
        );

        references
            .par_iter()
            .map(|reference| self.build(reference, neighbors))
            .collect()
    }

    /// Compute spin images for the cloud points at `reference_indices`,
    /// using the whole cloud as the neighbor set.
    pub fn build_for_cloud(
        &self,
        cloud: &OrientedPointCloud,
        reference_indices: &[usize],
    ) -> Result<Vec<SpinImage>> {
        let references = reference_indices
            .iter()
            .map(|&idx| {
                cloud.get(idx).copied().ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "reference index {} out of range for cloud of {} points",
                        idx,
                        cloud.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let neighbors = cloud.to_neighbor_set();
        self.build_batch(&references, &neighbors.as_neighbor_set())
    }
}

/// Compute a single spin image.
///
/// Shorthand for building a [`SpinImageBuilder`] and calling
/// [`SpinImageBuilder::build`].
pub fn compute_spin_image(
    reference: &OrientedPoint,
    neighbors: &NeighborSet<'_>,
    config: &SpinImageConfig,
) -> Result<SpinImage> {
    SpinImageBuilder::new(*config)?.build(reference, neighbors)
}

fn check_reference(reference: &OrientedPoint) -> Result<()> {
    if !reference.is_finite() {
        return Err(Error::InvalidInput(format!(
            "reference point must be finite, got position {:?} and normal {:?}",
            reference.position, reference.normal
        )));
    }

    let norm = reference.normal.norm();
    if (norm - 1.0).abs() > UNIT_NORMAL_TOLERANCE {
        warn!("Reference normal has length {:.6}, expected unit length", norm);
    }

    Ok(())
}
