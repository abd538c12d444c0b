//! Bricks and the per-brick decision flags.

use glam::{IVec3, Vec3};

use crate::constants::{cell_size, BRICK_CELL_COUNT, BRICK_CHILD_COUNT};
use crate::transform::RefVolTransform;
use crate::volume::Volume;

/// Cube on the reference lattice.
///
/// `position` is the minimum corner in reference units; the brick spans
/// `3^subdivision_level` units per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Brick {
  pub position: IVec3,
  pub subdivision_level: i32,
}

impl Brick {
  #[inline]
  pub fn new(position: IVec3, subdivision_level: i32) -> Self {
    Self {
      position,
      subdivision_level,
    }
  }

  /// Edge length in reference units.
  #[inline]
  pub fn size(&self) -> i32 {
    cell_size(self.subdivision_level)
  }

  /// Volume in reference space: integer corner, axis-aligned edges.
  pub fn ref_space_volume(&self) -> Volume {
    let size = self.size() as f32;
    Volume::new(self.position.as_vec3(), Vec3::X * size, Vec3::Y * size, Vec3::Z * size)
  }

  /// World-space volume: the brick corner mapped through the transform, with
  /// each matrix column scaled by the brick size as an edge.
  pub fn volume(&self, transform: &RefVolTransform) -> Volume {
    let size = self.size() as f32;
    let m = &transform.ref_space_to_ws;
    Volume::new(
      m.transform_point3(self.position.as_vec3()),
      Vec3::from(m.matrix3.x_axis) * size,
      Vec3::from(m.matrix3.y_axis) * size,
      Vec3::from(m.matrix3.z_axis) * size,
    )
  }

  /// The 27 bricks one level finer that tile this one. Empty at level 0.
  ///
  /// Ordered x fastest, then y, then z.
  pub fn children(&self) -> smallvec::SmallVec<[Brick; BRICK_CHILD_COUNT]> {
    if self.subdivision_level <= 0 {
      return smallvec::SmallVec::new();
    }

    let level = self.subdivision_level - 1;
    let offset = cell_size(level);
    let mut children = smallvec::SmallVec::new();
    for z in 0..BRICK_CELL_COUNT {
      for y in 0..BRICK_CELL_COUNT {
        for x in 0..BRICK_CELL_COUNT {
          children.push(Brick::new(self.position + IVec3::new(x, y, z) * offset, level));
        }
      }
    }
    children
  }
}

/// Verdict for one brick at one level.
///
/// `subdivide` asks the builder to split the brick; `discard` drops the brick
/// itself from the output. A brick may be both split and discarded (it
/// straddles the cell boundary) or kept without splitting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrickFlags {
  pub subdivide: bool,
  pub discard: bool,
}

impl BrickFlags {
  pub const DISCARD: Self = Self {
    subdivide: false,
    discard: true,
  };
}
