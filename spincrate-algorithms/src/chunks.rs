//! Chunk-based spin image extraction
//!
//! A chunk is a list of indices into a point cloud together with the
//! position, inside that list, of the point whose spin image is wanted.
//! Every point of the chunk (the reference included) serves as a neighbor.

use crate::config::SpinImageConfig;
use crate::spin_image::SpinImageBuilder;
use log::info;
use rayon::prelude::*;
use spincrate_core::{
    Error, OrientedPoint, OrientedPointCloud, OwnedNeighborSet, Result, SpinImage,
};
use std::ops::Range;

/// Position of the reference point inside a chunk when none is specified
pub const DEFAULT_CHUNK_REFERENCE: usize = 500;

/// A neighborhood of a point cloud given by index list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Indices into the cloud, in neighbor order
    pub indices: Vec<usize>,
    /// Position within `indices` of the reference point
    pub reference: usize,
}

impl Chunk {
    pub fn new(indices: Vec<usize>, reference: usize) -> Self {
        Self { indices, reference }
    }

    /// Chunk covering a contiguous range of cloud indices
    pub fn from_range(range: Range<usize>, reference: usize) -> Self {
        Self {
            indices: range.collect(),
            reference,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Cloud index of the reference point
    pub fn reference_index(&self) -> Result<usize> {
        self.indices.get(self.reference).copied().ok_or_else(|| {
            Error::InvalidInput(format!(
                "chunk reference position {} out of range for chunk of {} points",
                self.reference,
                self.indices.len()
            ))
        })
    }

    /// Gather the reference point and the chunk's neighbor set from `cloud`
    pub fn select(&self, cloud: &OrientedPointCloud) -> Result<(OrientedPoint, OwnedNeighborSet)> {
        let reference_index = self.reference_index()?;
        let neighbors = cloud.select_by_index(&self.indices)?;
        let reference = OrientedPoint::new(
            neighbors.positions[self.reference],
            neighbors.normals[self.reference],
        );
        debug_assert_eq!(Some(&reference), cloud.get(reference_index));
        Ok((reference, neighbors))
    }
}

/// Split `len` points into consecutive chunks of `chunk_size`.
///
/// The last chunk holds the remainder and may be shorter. `reference` is
/// clamped to the last point of a chunk that is too short to contain it.
pub fn split_into_chunks(len: usize, chunk_size: usize, reference: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(Error::InvalidInput("chunk_size must be greater than 0".to_string()));
    }

    Ok((0..len)
        .step_by(chunk_size)
        .map(|start| {
            let end = (start + chunk_size).min(len);
            Chunk::from_range(start..end, reference.min(end - start - 1))
        })
        .collect())
}

/// Compute one spin image per chunk.
///
/// Chunks are processed in parallel; the output follows the order of
/// `chunks`. Any invalid chunk fails the whole call.
pub fn compute_chunk_spin_images(
    cloud: &OrientedPointCloud,
    chunks: &[Chunk],
    config: &SpinImageConfig,
) -> Result<Vec<SpinImage>> {
    let builder = SpinImageBuilder::new(*config)?;

    info!(
        "Computing spin images for {} chunks of a {} point cloud",
        chunks.len(),
        cloud.len()
    );

    chunks
        .par_iter()
        .map(|chunk| {
            let (reference, neighbors) = chunk.select(cloud)?;
            builder.build(&reference, &neighbors.as_neighbor_set())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spincrate_core::{Point3d, Vector3d};

    fn line_cloud(n: usize) -> OrientedPointCloud {
        (0..n)
            .map(|i| OrientedPoint::new(Point3d::new(i as f64, 0.0, 0.0), Vector3d::z()))
            .collect()
    }

    #[test]
    fn test_split_into_chunks() {
        let chunks = split_into_chunks(10, 4, 1).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].indices, vec![0, 1, 2, 3]);
        assert_eq!(chunks[2].indices, vec![8, 9]);
        assert_eq!(chunks[2].reference, 1);
    }

    #[test]
    fn test_split_clamps_reference() {
        let chunks = split_into_chunks(7, 4, DEFAULT_CHUNK_REFERENCE).unwrap();
        assert_eq!(chunks[0].reference, 3);
        assert_eq!(chunks[1].reference, 2);
    }

    #[test]
    fn test_split_edge_cases() {
        assert!(split_into_chunks(10, 0, 0).is_err());
        assert!(split_into_chunks(0, 5, 0).unwrap().is_empty());
    }

    #[test]
    fn test_select() {
        let cloud = line_cloud(10);
        let chunk = Chunk::new(vec![7, 2, 5], 1);
        let (reference, neighbors) = chunk.select(&cloud).unwrap();
        assert_eq!(reference.position, Point3d::new(2.0, 0.0, 0.0));
        assert_eq!(neighbors.len(), 3);
        assert_eq!(neighbors.positions[0].x, 7.0);
    }

    #[test]
    fn test_select_invalid() {
        let cloud = line_cloud(5);
        assert!(Chunk::new(vec![0, 1], 2).select(&cloud).is_err());
        assert!(Chunk::new(vec![0, 9], 0).select(&cloud).is_err());
        assert!(Chunk::new(vec![], 0).select(&cloud).is_err());
    }

    #[test]
    fn test_compute_chunk_spin_images_order() {
        let cloud = line_cloud(6);
        let config = SpinImageConfig::default()
            .with_resolution(8)
            .with_bin_size(1.0)
            .with_support_angle(std::f64::consts::PI);
        let chunks = vec![Chunk::from_range(0..3, 0), Chunk::from_range(3..6, 1)];
        let images = compute_chunk_spin_images(&cloud, &chunks, &config).unwrap();

        assert_eq!(images.len(), 2);
        // First chunk: reference at x=0, neighbors at alpha 0, 1, 2
        assert_eq!(images[0].get(4, 0), Some(1.0));
        assert_eq!(images[0].get(4, 1), Some(1.0));
        assert_eq!(images[0].get(4, 2), Some(1.0));
        // Second chunk: reference at x=4, neighbors at alpha 1, 0, 1
        assert_eq!(images[1].get(4, 0), Some(1.0));
        assert_eq!(images[1].get(4, 1), Some(2.0));
    }
}
