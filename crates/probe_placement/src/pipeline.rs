//! Cell pipeline orchestrator.
//!
//! Runs extraction → culling → subdivision → positioning for a cell. Cells
//! share no mutable state, so a sweep over many cells runs on rayon.
//!
//! # Usage
//!
//! ```ignore
//! let reference = ReferenceVolume::from_config(&config)?;
//!
//! let placements = place_probes_parallel(
//!     &cells,
//!     &reference,
//!     markers.as_slice(),
//!     &renderers,
//!     &markers,
//! );
//!
//! // Host: upload placements[i].subdivision.positions for baking
//! ```

use rayon::prelude::*;
use web_time::Instant;

use crate::builder::BrickBuilder;
use crate::extraction::{create_influence_volumes, InfluenceVolumes};
use crate::positioning::{subdivide, SubdivisionOutput};
use crate::scene::{IndicatorSource, RendererSource, SceneQuery};
use crate::volume::Volume;

/// Wall-clock time spent in each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellTimings {
  pub extraction_us: u64,
  pub subdivision_us: u64,
}

/// Result of placing probes in one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPlacement {
  pub extraction: InfluenceVolumes,
  pub subdivision: SubdivisionOutput,
  pub timings: CellTimings,
}

/// Place probes in one cell.
///
/// Subdivision runs on the cell as raised by extraction, with the culled
/// influence volumes.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pipeline::place_probes"))]
pub fn place_probes<B, S>(
  cell_volume: &Volume,
  builder: &B,
  scene: &S,
  renderers: &[RendererSource],
  markers: &[IndicatorSource],
) -> CellPlacement
where
  B: BrickBuilder + ?Sized,
  S: SceneQuery + ?Sized,
{
  let start = Instant::now();
  let extraction = create_influence_volumes(cell_volume, renderers, markers);
  let extraction_us = start.elapsed().as_micros() as u64;

  let start = Instant::now();
  let subdivision = subdivide(&extraction.cell_volume, builder, scene, &extraction.culled_volumes);
  let subdivision_us = start.elapsed().as_micros() as u64;

  CellPlacement {
    extraction,
    subdivision,
    timings: CellTimings {
      extraction_us,
      subdivision_us,
    },
  }
}

/// Place probes in every cell on the rayon pool. Output order matches `cells`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pipeline::place_probes_parallel"))]
pub fn place_probes_parallel<B, S>(
  cells: &[Volume],
  builder: &B,
  scene: &S,
  renderers: &[RendererSource],
  markers: &[IndicatorSource],
) -> Vec<CellPlacement>
where
  B: BrickBuilder + Sync + ?Sized,
  S: SceneQuery + Sync + ?Sized,
{
  if cells.is_empty() {
    return Vec::new();
  }

  let placements: Vec<CellPlacement> = cells
    .par_iter()
    .map(|cell| place_probes(cell, builder, scene, renderers, markers))
    .collect();

  #[cfg(feature = "tracing")]
  tracing::debug!(
    cells = placements.len(),
    bricks = placements.iter().map(|p| p.subdivision.bricks.len()).sum::<usize>(),
    "placed probes"
  );

  placements
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
