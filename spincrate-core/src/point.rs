//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A single precision point with normal vector, as produced by normal estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalPoint3f {
    pub position: Point3f,
    pub normal: Vector3f,
}

impl Default for NormalPoint3f {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

/// A surface sample with position and unit normal, in double precision.
///
/// The normal is expected to be unit length. Descriptor builders use it
/// as given; use [`OrientedPoint::with_normalized`] to normalize up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedPoint {
    pub position: Point3d,
    pub normal: Vector3d,
}

impl OrientedPoint {
    /// Create an oriented point from a position and a normal
    pub fn new(position: Point3d, normal: Vector3d) -> Self {
        Self { position, normal }
    }

    /// Create an oriented point, normalizing `normal` first.
    ///
    /// Returns `None` when the normal is too short to normalize.
    pub fn with_normalized(position: Point3d, normal: Vector3d) -> Option<Self> {
        normal
            .try_normalize(f64::EPSILON)
            .map(|normal| Self { position, normal })
    }

    /// True when both position and normal contain only finite components
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite()) && self.normal.iter().all(|c| c.is_finite())
    }
}

impl Default for OrientedPoint {
    fn default() -> Self {
        Self {
            position: Point3d::origin(),
            normal: Vector3d::new(0.0, 0.0, 1.0),
        }
    }
}

impl From<NormalPoint3f> for OrientedPoint {
    fn from(point: NormalPoint3f) -> Self {
        Self {
            position: point.position.cast::<f64>(),
            normal: point.normal.cast::<f64>(),
        }
    }
}
