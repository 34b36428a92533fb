//! # Spincrate Algorithms
//!
//! Spin-image descriptor computation for oriented 3D point clouds.
//!
//! This crate turns an oriented reference point and a pre-selected
//! neighborhood into a spin image, either one at a time, in parallel batches
//! over shared neighbor data, or per chunk of a larger cloud.

pub mod config;
pub mod spin_image;
pub mod chunks;

// Re-export commonly used items
pub use config::*;
pub use spin_image::*;
pub use chunks::*;
