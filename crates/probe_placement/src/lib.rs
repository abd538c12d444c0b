//! probe_placement - Engine independent adaptive probe placement
//!
//! Subdivides space into a sparse hierarchy of cubical bricks driven by scene
//! geometry and by placement-control volumes, then turns the kept bricks into
//! world-space probe sample positions.
//!
//! # Features
//!
//! - **Oriented volumes**: corner + edge boxes with a separating-axis
//!   intersection test
//! - **Volume extraction**: renderer and marker volumes per cell, with scene
//!   provenance
//! - **Brick subdivision**: per-level subdivide/discard decisions driven by
//!   subdivision multipliers
//! - **Reference volume**: a built-in 3x3x3 hierarchical brick builder
//! - **Parallel cells**: independent cells placed on the rayon pool
//!
//! # Example
//!
//! ```ignore
//! use probe_placement::{place_probes, PlacementConfig, ReferenceVolume};
//!
//! let config = PlacementConfig::load(Path::new("placement.toml"))?;
//! let reference = ReferenceVolume::from_config(&config)?;
//!
//! let placement = place_probes(&cell, &reference, markers.as_slice(), &renderers, &markers);
//!
//! println!("{} bricks, {} probes",
//!     placement.subdivision.bricks.len(), placement.subdivision.probe_count);
//! ```

pub mod aabb;
pub mod brick;
pub mod constants;
pub mod obb;
pub mod transform;
pub mod volume;

pub use aabb::Aabb;
pub use brick::{Brick, BrickFlags};
pub use constants::{cell_size, BRICK_CELL_COUNT, BRICK_PROBE_COUNT_PER_DIM, BRICK_PROBE_COUNT_TOTAL, MAX_SUBDIVISION_LEVELS};
pub use obb::obb_intersect;
pub use transform::RefVolTransform;
pub use volume::Volume;

// Host-side scene records
pub mod scene;
pub use scene::{IndicatorSource, RendererSource, SceneId, SceneQuery, SceneRefs};

// Extraction and culling of influence volumes
pub mod culling;
pub mod extraction;
pub use culling::cull_volumes;
pub use extraction::{create_influence_volumes, InfluenceVolumes};

// Subdivision policy and the builder it plugs into
pub mod builder;
pub mod subdivision;
pub use builder::{BrickBuilder, BrickSet, Subdivider};
pub use subdivision::{should_keep_brick, subdivision_algorithm, PlacementSubdivider, SubdivisionStats};

pub mod reference_volume;
pub use reference_volume::ReferenceVolume;

pub mod positioning;
pub use positioning::{subdivide, SubdivisionOutput};

// Cell pipeline with rayon sweep
pub mod pipeline;
pub use pipeline::{place_probes, place_probes_parallel, CellPlacement, CellTimings};

pub mod config;
pub mod error;
pub use config::{PlacementConfig, ReferenceVolumeConfig};
pub use error::PlacementError;

pub mod metrics;
pub use metrics::PlacementMetrics;

#[cfg(test)]
pub mod test_utils;
