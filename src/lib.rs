//! # spincrate
//!
//! Spin-image surface descriptors for oriented 3D point clouds.
//!
//! This is the umbrella crate that provides convenient access to all spincrate functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Oriented points, point clouds, neighbor sets and the `SpinImage` histogram
//! - **Algorithms**: Spin image construction, batch and chunk processing, configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use spincrate::prelude::*;
//!
//! fn main() -> spincrate::Result<()> {
//!     let cloud: OrientedPointCloud = (0..20)
//!         .map(|i| OrientedPoint::new(Point3d::new(i as f64 * 0.01, 0.0, 0.0), Vector3d::z()))
//!         .collect();
//!
//!     let builder = SpinImageBuilder::new(SpinImageConfig::default())?;
//!     let images = builder.build_for_cloud(&cloud, &[0, 10])?;
//!     assert_eq!(images.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core and algorithms
//! - `algorithms`: Spin image computation
//! - `all`: Enables all features

// Re-export core functionality
pub use spincrate_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use spincrate_algorithms as algorithms;

/// Convenient imports for common use cases
pub mod prelude {
    pub use spincrate_core::*;

    #[cfg(feature = "algorithms")]
    pub use spincrate_algorithms::*;
}
