//! Reference volume: the built-in hierarchical brick builder.
//!
//! # Refinement loop
//!
//! ```text
//! cell (world) ──inverse──▶ cell (reference space) ──▶ AABB
//!                                                       │ rasterize at 3^max
//!                                                       ▼
//!   pass 0:  candidates = coarsest bricks overlapping the cell
//!   pass p:  flags = subdivider(p, candidates)
//!            keep  !discard            → output
//!            split  subdivide, level>0 → 27 children, culled against the cell
//!            candidates = children
//! ```
//!
//! The loop ends when no candidates remain or after the level-0 pass.
//! Output is sorted coarse-to-fine, then by z, y, x.

use glam::{IVec3, Vec3};

use crate::brick::Brick;
use crate::builder::{BrickBuilder, BrickSet, Subdivider};
use crate::config::{PlacementConfig, ReferenceVolumeConfig};
use crate::constants::{cell_size, BRICK_CELL_COUNT, BRICK_PROBE_COUNT_PER_DIM, BRICK_PROBE_COUNT_TOTAL};
use crate::error::Result;
use crate::obb::obb_intersect;
use crate::transform::RefVolTransform;
use crate::volume::Volume;

/// Brick lattice placed in the world, with its maximum depth.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceVolume {
  config: ReferenceVolumeConfig,
  transform: RefVolTransform,
}

impl ReferenceVolume {
  /// Build from an already validated config.
  pub fn new(config: ReferenceVolumeConfig) -> Self {
    Self {
      transform: config.transform(),
      config,
    }
  }

  /// Validate `config` and build from its reference-volume section.
  pub fn from_config(config: &PlacementConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self::new(config.reference_volume))
  }

  pub fn config(&self) -> &ReferenceVolumeConfig {
    &self.config
  }

  pub fn transform(&self) -> &RefVolTransform {
    &self.transform
  }

  /// Coarsest-level bricks whose cube intersects `cell_ref_space`.
  ///
  /// The raster range is clamped so every brick, children included, has
  /// corners representable in `i32`. Cells beyond that range yield no bricks.
  fn rasterize(&self, cell_ref_space: &Volume) -> Vec<Brick> {
    let level = self.config.max_subdivision;
    let size = cell_size(level);
    let aabb = cell_ref_space.calculate_aabb();

    let limit = IVec3::splat(i32::MAX / size);
    let min = (aabb.min / size as f32).floor().as_ivec3().clamp(-limit, limit - IVec3::ONE);
    let max = (aabb.max / size as f32)
      .ceil()
      .as_ivec3()
      .clamp(-limit, limit)
      .max(min + IVec3::ONE);

    let mut bricks = Vec::new();
    for z in min.z..max.z {
      for y in min.y..max.y {
        for x in min.x..max.x {
          let brick = Brick::new(IVec3::new(x, y, z) * size, level);
          if obb_intersect(cell_ref_space, &brick.ref_space_volume()) {
            bricks.push(brick);
          }
        }
      }
    }
    bricks
  }

  /// Refine one cell, appending kept bricks to `out`.
  fn convert_volume(&self, cell_volume: &Volume, subdivider: &mut dyn Subdivider, out: &mut Vec<Brick>) {
    let cell_ref_space = cell_volume.transformed(&self.transform.ws_to_ref_space);
    let mut candidates = self.rasterize(&cell_ref_space);

    let mut pass = 0;
    while !candidates.is_empty() && pass <= self.config.max_subdivision {
      let flags = subdivider.subdivide(&self.transform, pass, &candidates);
      debug_assert_eq!(flags.len(), candidates.len(), "subdivider must flag every brick");

      let mut children = Vec::new();
      for (brick, flag) in candidates.iter().zip(&flags) {
        if !flag.discard {
          out.push(*brick);
        }
        if flag.subdivide {
          children.extend(
            brick
              .children()
              .into_iter()
              .filter(|child| obb_intersect(&cell_ref_space, &child.ref_space_volume())),
          );
        }
      }

      #[cfg(feature = "tracing")]
      tracing::debug!(
        pass,
        candidates = candidates.len(),
        children = children.len(),
        kept = out.len(),
        "refinement pass"
      );

      candidates = children;
      pass += 1;
    }
  }
}

impl BrickBuilder for ReferenceVolume {
  #[inline]
  fn max_subdivision(&self, multiplier: f32) -> i32 {
    (self.config.max_subdivision as f32 * multiplier).ceil() as i32
  }

  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "reference_volume::create_bricks"))]
  fn create_bricks(
    &self,
    cell_volumes: &[Volume],
    _influence_volumes: &[Volume],
    subdivider: &mut dyn Subdivider,
  ) -> BrickSet {
    let mut bricks = Vec::new();
    for cell_volume in cell_volumes {
      self.convert_volume(cell_volume, subdivider, &mut bricks);
    }

    bricks.sort_by_key(|b| (-b.subdivision_level, b.position.z, b.position.y, b.position.x));

    let probe_count = bricks.len() * BRICK_PROBE_COUNT_TOTAL;
    BrickSet { bricks, probe_count }
  }

  fn convert_bricks(&self, bricks: &[Brick]) -> Vec<Vec3> {
    let m = &self.transform.ref_space_to_ws;
    let mut positions = Vec::with_capacity(bricks.len() * BRICK_PROBE_COUNT_TOTAL);

    for brick in bricks {
      let origin = brick.position.as_vec3();
      let spacing = brick.size() as f32 / BRICK_CELL_COUNT as f32;
      for z in 0..BRICK_PROBE_COUNT_PER_DIM {
        for y in 0..BRICK_PROBE_COUNT_PER_DIM {
          for x in 0..BRICK_PROBE_COUNT_PER_DIM {
            let offset = Vec3::new(x as f32, y as f32, z as f32) * spacing;
            positions.push(m.transform_point3(origin + offset));
          }
        }
      }
    }

    positions
  }
}

#[cfg(test)]
#[path = "reference_volume_test.rs"]
mod reference_volume_test;
