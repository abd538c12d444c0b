//! Brick-to-position conversion for one cell.

use glam::Vec3;

use crate::brick::Brick;
use crate::builder::BrickBuilder;
use crate::scene::SceneQuery;
use crate::subdivision::{PlacementSubdivider, SubdivisionStats};
use crate::volume::Volume;

/// Bricks and probe positions produced for a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubdivisionOutput {
  /// World-space probe positions, 64 per brick in brick order.
  pub positions: Vec<Vec3>,
  pub bricks: Vec<Brick>,
  /// Probe count reported by the builder.
  pub probe_count: usize,
  pub stats: SubdivisionStats,
}

/// Subdivide `cell_volume` into bricks and convert them to probe positions.
///
/// Indicator volumes come from the markers `scene` lists, skipping disabled
/// ones. `influence_volumes` is usually the culled output of extraction.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "positioning::subdivide"))]
pub fn subdivide<B, S>(
  cell_volume: &Volume,
  builder: &B,
  scene: &S,
  influence_volumes: &[Volume],
) -> SubdivisionOutput
where
  B: BrickBuilder + ?Sized,
  S: SceneQuery + ?Sized,
{
  let indicator_volumes: Vec<Volume> = scene
    .list_active_markers()
    .iter()
    .filter(|m| m.enabled)
    .map(|m| m.to_volume())
    .collect();

  let mut subdivider = PlacementSubdivider::new(
    *cell_volume,
    &indicator_volumes,
    influence_volumes,
    |multiplier| builder.max_subdivision(multiplier),
  );

  let set = builder.create_bricks(std::slice::from_ref(cell_volume), influence_volumes, &mut subdivider);
  let positions = builder.convert_bricks(&set.bricks);

  #[cfg(feature = "tracing")]
  tracing::debug!(
    bricks = set.bricks.len(),
    probes = set.probe_count,
    indicators = indicator_volumes.len(),
    "cell subdivided"
  );

  SubdivisionOutput {
    positions,
    bricks: set.bricks,
    probe_count: set.probe_count,
    stats: subdivider.stats(),
  }
}

#[cfg(test)]
#[path = "positioning_test.rs"]
mod positioning_test;
