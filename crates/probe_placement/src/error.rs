//! Error type for the fallible entry points (configuration loading).
//!
//! Geometry operations are total and never return errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacementError {
  #[error("failed to read config file {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config TOML: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlacementError>;
