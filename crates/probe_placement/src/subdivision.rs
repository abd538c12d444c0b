//! Brick subdivision algorithm.
//!
//! Called by the brick builder once per refinement pass with every candidate
//! brick of that pass. A brick is split when an indicator volume wants
//! detail there: either unconditionally up to the indicator's minimum depth,
//! or up to its maximum depth where scene geometry is also present.
//!
//! # Decision per brick
//!
//! ```text
//! overlap    = any indicator intersects the brick
//! local_max  = max of intersecting indicators' max multipliers
//! local_min  = max of intersecting indicators' min multipliers
//!
//! subdivide  = (level <= depth(local_min) && overlap)
//!           || (level <= depth(local_max) && overlap && any influence intersects)
//! discard    = !subdivide || brick leaves the cell
//! ```

use crate::brick::{Brick, BrickFlags};
use crate::builder::Subdivider;
use crate::obb::obb_intersect;
use crate::transform::RefVolTransform;
use crate::volume::Volume;

/// Slack for the cell containment test, in reference units. Brick corners
/// sit on integers; the cell picks up rounding from the inverse transform.
const CONTAINMENT_EPSILON: f32 = 1e-4;

/// Flags for `bricks` at `subdivision_level` (pass index, 0 = coarsest).
///
/// `max_subdivision` maps a multiplier to the deepest pass it allows; brick
/// builders expose it as [`crate::BrickBuilder::max_subdivision`].
pub fn subdivision_algorithm(
  cell_volume: &Volume,
  indicator_volumes: &[Volume],
  influence_volumes: &[Volume],
  ref_trans: &RefVolTransform,
  bricks: &[Brick],
  subdivision_level: i32,
  max_subdivision: impl Fn(f32) -> i32,
) -> Vec<BrickFlags> {
  let cell_ref_space = cell_volume.transformed(&ref_trans.ws_to_ref_space);
  let cell_max = cell_ref_space.max_corner();

  bricks
    .iter()
    .map(|brick| {
      let brick_volume = brick.volume(ref_trans);

      let mut local_max_subdiv = 0.0f32;
      let mut local_min_subdiv = 0.0f32;
      let mut overlap = false;
      for v in indicator_volumes {
        if obb_intersect(v, &brick_volume) {
          overlap = true;
          local_max_subdiv = local_max_subdiv.max(v.max_subdivision_multiplier);
          local_min_subdiv = local_min_subdiv.max(v.min_subdivision_multiplier);
        }
      }

      let below_max_subdiv = subdivision_level <= max_subdivision(local_max_subdiv);
      let below_min_subdiv = subdivision_level <= max_subdivision(local_min_subdiv);

      let keep = (below_min_subdiv && overlap)
        || (below_max_subdiv
          && should_keep_brick(indicator_volumes, &brick_volume)
          && should_keep_brick(influence_volumes, &brick_volume));
      if !keep {
        return BrickFlags::DISCARD;
      }

      let brick_ref_space = brick.ref_space_volume();
      let local_cell = cell_ref_space.with_max_subdivision(local_max_subdiv);

      #[cfg(feature = "tracing")]
      tracing::trace!(
        ?brick,
        local_max = local_cell.max_subdivision_multiplier,
        "subdividing brick"
      );

      // A brick poking out of the cell would be emitted again by the neighbor.
      let brick_max = brick_ref_space.max_corner();
      let discard = brick_max.cmpgt(cell_max + CONTAINMENT_EPSILON).any()
        || brick_ref_space.corner.cmplt(local_cell.corner - CONTAINMENT_EPSILON).any();

      BrickFlags {
        subdivide: true,
        discard,
      }
    })
    .collect()
}

/// True iff any volume intersects `brick`.
#[inline]
pub fn should_keep_brick(volumes: &[Volume], brick: &Volume) -> bool {
  volumes.iter().any(|v| obb_intersect(v, brick))
}

/// Counters from one cell's subdivision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubdivisionStats {
  /// Passes the builder ran.
  pub passes: usize,
  /// Bricks evaluated across all passes.
  pub bricks_evaluated: usize,
  /// Bricks flagged for subdivision.
  pub subdivided: usize,
  /// Bricks flagged for discard.
  pub discarded: usize,
}

/// [`Subdivider`] running [`subdivision_algorithm`] for one cell.
pub struct PlacementSubdivider<'a, F> {
  cell_volume: Volume,
  indicator_volumes: &'a [Volume],
  influence_volumes: &'a [Volume],
  max_subdivision: F,
  stats: SubdivisionStats,
}

impl<'a, F: Fn(f32) -> i32> PlacementSubdivider<'a, F> {
  pub fn new(
    cell_volume: Volume,
    indicator_volumes: &'a [Volume],
    influence_volumes: &'a [Volume],
    max_subdivision: F,
  ) -> Self {
    Self {
      cell_volume,
      indicator_volumes,
      influence_volumes,
      max_subdivision,
      stats: SubdivisionStats::default(),
    }
  }

  pub fn stats(&self) -> SubdivisionStats {
    self.stats
  }
}

impl<F: Fn(f32) -> i32> Subdivider for PlacementSubdivider<'_, F> {
  fn subdivide(&mut self, transform: &RefVolTransform, level: i32, bricks: &[Brick]) -> Vec<BrickFlags> {
    let flags = subdivision_algorithm(
      &self.cell_volume,
      self.indicator_volumes,
      self.influence_volumes,
      transform,
      bricks,
      level,
      &self.max_subdivision,
    );

    self.stats.passes += 1;
    self.stats.bricks_evaluated += bricks.len();
    self.stats.subdivided += flags.iter().filter(|f| f.subdivide).count();
    self.stats.discarded += flags.iter().filter(|f| f.discard).count();

    flags
  }
}

#[cfg(test)]
#[path = "subdivision_test.rs"]
mod subdivision_test;
