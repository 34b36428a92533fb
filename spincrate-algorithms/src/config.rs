//! Spin image configuration

use serde::{Deserialize, Serialize};
use spincrate_core::{Error, Result};
use std::f64::consts::PI;
use std::path::Path;

/// Parameters of a spin image descriptor.
///
/// All lengths are in the units of the point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinImageConfig {
    /// Edge length of one bin along both the α and β axes.
    /// Default: 0.007
    pub bin_size: f64,

    /// Number of bins per axis. The image is `resolution × resolution`.
    /// Default: 80
    pub resolution: usize,

    /// Maximum angle in radians between the reference normal and a neighbor
    /// normal for the neighbor to contribute. `π` accepts every neighbor.
    /// Default: 140°
    pub support_angle: f64,

    /// Radius the caller used to select the neighbor set.
    ///
    /// The builder does not cull by distance. Neighbors farther away still
    /// contribute if they land inside the image.
    /// Default: 0.05
    pub support_radius: f64,
}

impl Default for SpinImageConfig {
    fn default() -> Self {
        Self {
            bin_size: 0.007,
            resolution: 80,
            support_angle: 140.0_f64.to_radians(),
            support_radius: 0.05,
        }
    }
}

impl SpinImageConfig {
    /// Configuration with every field given explicitly, support angle in radians
    pub fn new(bin_size: f64, resolution: usize, support_angle: f64, support_radius: f64) -> Self {
        Self {
            bin_size,
            resolution,
            support_angle,
            support_radius,
        }
    }

    /// Set the bin edge length
    pub fn with_bin_size(mut self, bin_size: f64) -> Self {
        self.bin_size = bin_size;
        self
    }

    /// Set the number of bins per axis
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the support angle in radians
    pub fn with_support_angle(mut self, support_angle: f64) -> Self {
        self.support_angle = support_angle;
        self
    }

    /// Set the support angle in degrees
    pub fn with_support_angle_degrees(mut self, degrees: f64) -> Self {
        self.support_angle = degrees.to_radians();
        self
    }

    /// Set the neighborhood radius
    pub fn with_support_radius(mut self, support_radius: f64) -> Self {
        self.support_radius = support_radius;
        self
    }

    /// Check every field against its constraint.
    ///
    /// Fails with [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(Error::invalid_config(
                "resolution",
                format!("must be at least 2, got {}", self.resolution),
            ));
        }

        let grid_bytes = self
            .resolution
            .checked_mul(self.resolution)
            .and_then(|bins| bins.checked_mul(std::mem::size_of::<f64>()));
        if !grid_bytes.is_some_and(|bytes| bytes <= isize::MAX as usize) {
            return Err(Error::invalid_config(
                "resolution",
                format!("{0}x{0} grid exceeds the addressable size", self.resolution),
            ));
        }

        if !(self.bin_size.is_finite() && self.bin_size > 0.0) {
            return Err(Error::invalid_config(
                "bin_size",
                format!("must be positive and finite, got {}", self.bin_size),
            ));
        }

        if !(0.0..=PI).contains(&self.support_angle) {
            return Err(Error::invalid_config(
                "support_angle",
                format!("must lie in [0, pi] radians, got {}", self.support_angle),
            ));
        }

        if !(self.support_radius.is_finite() && self.support_radius > 0.0) {
            return Err(Error::invalid_config(
                "support_radius",
                format!("must be positive and finite, got {}", self.support_radius),
            ));
        }

        Ok(())
    }

    /// Cosine of the support angle; neighbors whose normal dot product falls
    /// below this are rejected.
    pub fn cos_threshold(&self) -> f64 {
        self.support_angle.cos()
    }

    /// Parse a configuration from TOML.
    ///
    /// Missing keys take their default values. The support angle may be given
    /// either as `support_angle` (radians) or `support_angle_degrees`, not both.
    ///
    /// ```
    /// use spincrate_algorithms::SpinImageConfig;
    ///
    /// let source = "resolution = 16\nsupport_angle_degrees = 60.0";
    /// let config = SpinImageConfig::from_toml_str(source).unwrap();
    /// assert_eq!(config.resolution, 16);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(source)?;
        let config = file.into_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

/// On-disk layout, every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    bin_size: Option<f64>,
    resolution: Option<usize>,
    support_angle: Option<f64>,
    support_angle_degrees: Option<f64>,
    support_radius: Option<f64>,
}

impl ConfigFile {
    fn into_config(self) -> Result<SpinImageConfig> {
        let defaults = SpinImageConfig::default();
        let support_angle = match (self.support_angle, self.support_angle_degrees) {
            (Some(_), Some(_)) => {
                return Err(Error::Config(
                    "set either `support_angle` or `support_angle_degrees`, not both".to_string(),
                ))
            }
            (Some(radians), None) => radians,
            (None, Some(degrees)) => degrees.to_radians(),
            (None, None) => defaults.support_angle,
        };

        Ok(SpinImageConfig {
            bin_size: self.bin_size.unwrap_or(defaults.bin_size),
            resolution: self.resolution.unwrap_or(defaults.resolution),
            support_angle,
            support_radius: self.support_radius.unwrap_or(defaults.support_radius),
        })
    }
}
