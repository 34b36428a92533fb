//! Core data structures for spincrate
//!
//! This crate provides the fundamental types shared by the spin-image
//! algorithms: oriented points, point clouds, neighbor sets, the spin
//! image histogram itself, and the common error type.

pub mod point;
pub mod point_cloud;
pub mod spin_image;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use spin_image::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
