//! Placement configuration, loaded from TOML.
//!
//! ```toml
//! [reference_volume]
//! min_brick_size = 1.0
//! max_subdivision = 3
//! position = [0.0, 0.0, 0.0]
//! rotation = [0.0, 0.0, 0.0, 1.0]   # quaternion x, y, z, w
//! ```

use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_SUBDIVISION_LEVELS;
use crate::error::{PlacementError, Result};
use crate::transform::RefVolTransform;

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
  pub reference_volume: ReferenceVolumeConfig,
}

/// Reference lattice placement and depth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceVolumeConfig {
  /// World size of a level-0 brick.
  pub min_brick_size: f32,
  /// Coarsest brick level; cells are rasterized at this level.
  pub max_subdivision: i32,
  /// World position of the lattice origin.
  pub position: Vec3,
  pub rotation: Quat,
}

impl Default for ReferenceVolumeConfig {
  fn default() -> Self {
    Self {
      min_brick_size: 1.0,
      max_subdivision: 3,
      position: Vec3::ZERO,
      rotation: Quat::IDENTITY,
    }
  }
}

impl ReferenceVolumeConfig {
  /// Lattice transform described by this config.
  ///
  /// The rotation is normalized; call [`ReferenceVolumeConfig::validate`]
  /// first to reject rotations that cannot be.
  pub fn transform(&self) -> RefVolTransform {
    RefVolTransform::new(self.position, self.rotation.normalize(), self.min_brick_size)
  }

  pub fn validate(&self) -> Result<()> {
    if !self.min_brick_size.is_finite() || self.min_brick_size <= 0.0 {
      return Err(PlacementError::InvalidConfig(format!(
        "min_brick_size must be positive and finite, got {}",
        self.min_brick_size
      )));
    }
    if !(0..=MAX_SUBDIVISION_LEVELS).contains(&self.max_subdivision) {
      return Err(PlacementError::InvalidConfig(format!(
        "max_subdivision must be in 0..={}, got {}",
        MAX_SUBDIVISION_LEVELS, self.max_subdivision
      )));
    }
    if !self.position.is_finite() {
      return Err(PlacementError::InvalidConfig(format!(
        "position must be finite, got {}",
        self.position
      )));
    }
    let len = self.rotation.length();
    if !len.is_finite() || len < 1e-6 {
      return Err(PlacementError::InvalidConfig(format!(
        "rotation must be a non-zero quaternion, got {}",
        self.rotation
      )));
    }
    Ok(())
  }
}

impl PlacementConfig {
  /// Load and validate configuration from a TOML file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path).map_err(|source| PlacementError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml_str(&content)
  }

  /// Parse and validate configuration from TOML text.
  pub fn from_toml_str(content: &str) -> Result<Self> {
    let config: PlacementConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    self.reference_volume.validate()
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
