//! Seams between the subdivision policy and the brick builder.
//!
//! A [`BrickBuilder`] owns the reference lattice and runs the hierarchical
//! refinement loop; a [`Subdivider`] decides, level by level, which
//! candidate bricks to split and which to drop. The placement engine ships
//! one of each ([`crate::ReferenceVolume`], [`crate::PlacementSubdivider`]),
//! but hosts may supply their own.

use glam::Vec3;

use crate::brick::{Brick, BrickFlags};
use crate::transform::RefVolTransform;
use crate::volume::Volume;

/// Per-level brick decision callback.
///
/// `level` counts refinement passes from the coarsest level (0 = coarsest).
/// The result has one entry per input brick, in input order.
pub trait Subdivider {
  fn subdivide(&mut self, transform: &RefVolTransform, level: i32, bricks: &[Brick]) -> Vec<BrickFlags>;
}

impl<F> Subdivider for F
where
  F: FnMut(&RefVolTransform, i32, &[Brick]) -> Vec<BrickFlags>,
{
  fn subdivide(&mut self, transform: &RefVolTransform, level: i32, bricks: &[Brick]) -> Vec<BrickFlags> {
    self(transform, level, bricks)
  }
}

/// Bricks produced for a set of cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrickSet {
  pub bricks: Vec<Brick>,
  /// Probes needed to sample every brick.
  pub probe_count: usize,
}

/// Hierarchical brick builder.
pub trait BrickBuilder {
  /// Deepest pass a volume with this multiplier may subdivide at.
  fn max_subdivision(&self, multiplier: f32) -> i32;

  /// Refine `cell_volumes` into bricks, consulting `subdivider` once per pass.
  fn create_bricks(
    &self,
    cell_volumes: &[Volume],
    influence_volumes: &[Volume],
    subdivider: &mut dyn Subdivider,
  ) -> BrickSet;

  /// World-space probe positions for `bricks`, 64 per brick in brick order.
  fn convert_bricks(&self, bricks: &[Brick]) -> Vec<Vec3>;
}
