//! Point cloud containers and neighbor sets

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A generic point cloud container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A point cloud with normal vectors, single precision
pub type NormalPointCloud3f = PointCloud<NormalPoint3f>;

/// A point cloud of oriented points, double precision
pub type OrientedPointCloud = PointCloud<OrientedPoint>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
        }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }

    /// Get the point at `index`, if any
    pub fn get(&self, index: usize) -> Option<&T> {
        self.points.get(index)
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}

impl PointCloud<OrientedPoint> {
    /// Gather the points at `indices`, in the given order.
    ///
    /// Fails with [`Error::InvalidInput`] if any index is out of range.
    pub fn select_by_index(&self, indices: &[usize]) -> Result<OwnedNeighborSet> {
        let mut selected = OwnedNeighborSet::with_capacity(indices.len());
        for &idx in indices {
            let point = self.points.get(idx).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "index {} out of range for cloud of {} points",
                    idx,
                    self.len()
                ))
            })?;
            selected.push(*point);
        }
        Ok(selected)
    }

    /// Split the cloud into parallel position and normal arrays
    pub fn to_neighbor_set(&self) -> OwnedNeighborSet {
        self.points.iter().copied().collect()
    }
}

impl From<PointCloud<NormalPoint3f>> for PointCloud<OrientedPoint> {
    fn from(cloud: PointCloud<NormalPoint3f>) -> Self {
        cloud.points.into_iter().map(OrientedPoint::from).collect()
    }
}

/// Read-only view of candidate neighbors as two parallel sequences.
///
/// Entry `k` of `positions` and entry `k` of `normals` describe the same
/// surface sample. Lengths are not checked on construction; descriptor
/// builders reject mismatched sets.
#[derive(Debug, Clone, Copy)]
pub struct NeighborSet<'a> {
    pub positions: &'a [Point3d],
    pub normals: &'a [Vector3d],
}

impl<'a> NeighborSet<'a> {
    /// Borrow two parallel slices as a neighbor set
    pub fn new(positions: &'a [Point3d], normals: &'a [Vector3d]) -> Self {
        Self { positions, normals }
    }

    /// Number of neighbors, or `None` if the two sequences disagree
    pub fn checked_len(&self) -> Option<usize> {
        (self.positions.len() == self.normals.len()).then_some(self.positions.len())
    }

    /// Fail with [`Error::InvalidInput`] unless positions and normals have the same length
    pub fn validate(&self) -> Result<usize> {
        self.checked_len().ok_or_else(|| {
            Error::InvalidInput(format!(
                "neighbor set has {} positions but {} normals",
                self.positions.len(),
                self.normals.len()
            ))
        })
    }

    /// Iterate over `(position, normal)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&'a Point3d, &'a Vector3d)> + 'a {
        self.positions.iter().zip(self.normals.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Owned storage backing a [`NeighborSet`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnedNeighborSet {
    pub positions: Vec<Point3d>,
    pub normals: Vec<Vector3d>,
}

impl OwnedNeighborSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
        }
    }

    /// Append one oriented point
    pub fn push(&mut self, point: OrientedPoint) {
        self.positions.push(point.position);
        self.normals.push(point.normal);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Borrow as a [`NeighborSet`]
    pub fn as_neighbor_set(&self) -> NeighborSet<'_> {
        NeighborSet::new(&self.positions, &self.normals)
    }
}

impl FromIterator<OrientedPoint> for OwnedNeighborSet {
    fn from_iter<I: IntoIterator<Item = OrientedPoint>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        for point in iter {
            set.push(point);
        }
        set
    }
}

impl<'a> From<&'a OwnedNeighborSet> for NeighborSet<'a> {
    fn from(set: &'a OwnedNeighborSet) -> Self {
        set.as_neighbor_set()
    }
}
