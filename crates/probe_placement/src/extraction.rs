//! Volume extraction: which scene objects matter to a cell.
//!
//! Renderers become *influence* volumes (geometry worth sampling) and
//! probe-volume markers become *indicator* volumes (where sampling is
//! wanted, and how densely). Influence volumes that no indicator touches are
//! culled away.

use crate::culling::cull_volumes;
use crate::obb::obb_intersect;
use crate::scene::{IndicatorSource, RendererSource, SceneRefs};
use crate::volume::Volume;

/// Everything extraction learned about one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct InfluenceVolumes {
  /// The input cell with `max_subdivision_multiplier` raised by every
  /// intersecting marker.
  pub cell_volume: Volume,
  /// Influence volumes overlapping at least one indicator volume.
  pub culled_volumes: Vec<Volume>,
  /// Scenes that contributed influence or indicator volumes.
  pub scene_refs: SceneRefs,
}

/// Gather the influence volumes and scene provenance of `cell_volume`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "extraction::create_influence_volumes"))]
pub fn create_influence_volumes(
  cell_volume: &Volume,
  renderers: &[RendererSource],
  markers: &[IndicatorSource],
) -> InfluenceVolumes {
  let mut cell_volume = *cell_volume;
  let mut scene_refs = SceneRefs::new();

  let mut influence_volumes = Vec::new();
  renderers_to_volumes(renderers, &cell_volume, &mut influence_volumes, &mut scene_refs);
  nav_paths_to_volumes(&cell_volume, &mut influence_volumes, &mut scene_refs);
  importance_volumes_to_volumes(&cell_volume, &mut influence_volumes, &mut scene_refs);
  lights_to_volumes(&cell_volume, &mut influence_volumes, &mut scene_refs);

  let mut indicator_volumes = Vec::new();
  probe_volumes_to_volumes(markers, &mut cell_volume, &mut indicator_volumes, &mut scene_refs);

  let culled_volumes = cull_volumes(&influence_volumes, &indicator_volumes);

  #[cfg(feature = "tracing")]
  tracing::debug!(
    influences = influence_volumes.len(),
    indicators = indicator_volumes.len(),
    culled = culled_volumes.len(),
    scenes = scene_refs.len(),
    "extracted cell volumes"
  );

  InfluenceVolumes {
    cell_volume,
    culled_volumes,
    scene_refs,
  }
}

/// Append contributing renderers that intersect the cell. Returns the count added.
fn renderers_to_volumes(
  renderers: &[RendererSource],
  cell_volume: &Volume,
  volumes: &mut Vec<Volume>,
  scene_refs: &mut SceneRefs,
) -> usize {
  let mut num = 0;
  for renderer in renderers.iter().filter(|r| r.contributes()) {
    let v = Volume::from_aabb(&renderer.bounds);
    if obb_intersect(cell_volume, &v) {
      volumes.push(v);
      scene_refs.track(renderer.scene);
      num += 1;
    }
  }
  num
}

// Navigation paths, importance volumes and lights have no host
// representation yet and contribute nothing.

fn nav_paths_to_volumes(_cell_volume: &Volume, _volumes: &mut Vec<Volume>, _scene_refs: &mut SceneRefs) -> usize {
  0
}

fn importance_volumes_to_volumes(
  _cell_volume: &Volume,
  _volumes: &mut Vec<Volume>,
  _scene_refs: &mut SceneRefs,
) -> usize {
  0
}

fn lights_to_volumes(_cell_volume: &Volume, _volumes: &mut Vec<Volume>, _scene_refs: &mut SceneRefs) -> usize {
  0
}

/// Append active markers that intersect the cell, raising the cell's max
/// multiplier to cover each one. Returns the count added.
fn probe_volumes_to_volumes(
  markers: &[IndicatorSource],
  cell_volume: &mut Volume,
  volumes: &mut Vec<Volume>,
  scene_refs: &mut SceneRefs,
) -> usize {
  let mut num = 0;
  for marker in markers.iter().filter(|m| m.is_active_and_enabled()) {
    let indicator = marker.to_volume();
    if obb_intersect(cell_volume, &indicator) {
      cell_volume.max_subdivision_multiplier = cell_volume
        .max_subdivision_multiplier
        .max(marker.max_subdivision_multiplier)
        .max(marker.min_subdivision_multiplier);
      volumes.push(indicator);
      scene_refs.track(marker.scene);
      num += 1;
    }
  }
  num
}

#[cfg(test)]
#[path = "extraction_test.rs"]
mod extraction_test;
