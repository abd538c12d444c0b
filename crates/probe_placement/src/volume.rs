//! Oriented box volumes.
//!
//! A [`Volume`] is a parallelepiped given by a corner and three edge vectors.
//! The edges are usually orthogonal but nothing here relies on it, so a
//! volume pushed through a sheared or non-uniformly scaled matrix stays
//! exact.
//!
//! ```text
//!          corner + y ────── corner + x + y
//!              │                   │
//!              │                   │
//!            corner ─────────── corner + x      (z points out of the page)
//! ```

use glam::{Affine3A, Quat, Vec3};

use crate::aabb::Aabb;

/// Oriented box plus the subdivision multipliers it carries.
///
/// Multipliers only mean something on indicator volumes and on the cell
/// volume; influence volumes keep the defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volume {
  pub corner: Vec3,
  pub x: Vec3,
  pub y: Vec3,
  pub z: Vec3,
  /// Scales the deepest level this volume may drive subdivision to.
  pub max_subdivision_multiplier: f32,
  /// Scales the level this volume forces subdivision to regardless of geometry.
  pub min_subdivision_multiplier: f32,
}

impl Default for Volume {
  fn default() -> Self {
    Self {
      corner: Vec3::ZERO,
      x: Vec3::ZERO,
      y: Vec3::ZERO,
      z: Vec3::ZERO,
      max_subdivision_multiplier: 1.0,
      min_subdivision_multiplier: 0.0,
    }
  }
}

impl Volume {
  /// Volume from a corner and three edges with default multipliers.
  pub fn new(corner: Vec3, x: Vec3, y: Vec3, z: Vec3) -> Self {
    Self {
      corner,
      x,
      y,
      z,
      ..Default::default()
    }
  }

  /// Axis-aligned volume covering `aabb`.
  pub fn from_aabb(aabb: &Aabb) -> Self {
    let size = aabb.size();
    Self::new(
      aabb.center() - size * 0.5,
      Vec3::new(size.x, 0.0, 0.0),
      Vec3::new(0.0, size.y, 0.0),
      Vec3::new(0.0, 0.0, size.z),
    )
  }

  /// Box centered on `translation` whose edges are the matrix columns of
  /// `TRS(translation, rotation, scale)`.
  pub fn from_trs(
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    max_subdivision_multiplier: f32,
    min_subdivision_multiplier: f32,
  ) -> Self {
    let x = rotation * Vec3::new(scale.x, 0.0, 0.0);
    let y = rotation * Vec3::new(0.0, scale.y, 0.0);
    let z = rotation * Vec3::new(0.0, 0.0, scale.z);
    Self {
      corner: translation - (x + y + z) * 0.5,
      x,
      y,
      z,
      max_subdivision_multiplier,
      min_subdivision_multiplier,
    }
  }

  /// Same box mapped through `matrix`. Multipliers are carried over.
  pub fn transformed(&self, matrix: &Affine3A) -> Self {
    Self {
      corner: matrix.transform_point3(self.corner),
      x: matrix.transform_vector3(self.x),
      y: matrix.transform_vector3(self.y),
      z: matrix.transform_vector3(self.z),
      ..*self
    }
  }

  #[inline]
  pub fn center(&self) -> Vec3 {
    self.corner + (self.x + self.y + self.z) * 0.5
  }

  /// Corner opposite to `corner`.
  #[inline]
  pub fn max_corner(&self) -> Vec3 {
    self.corner + self.x + self.y + self.z
  }

  /// Half of the longest possible diagonal; every point of the box lies
  /// within this distance of [`Volume::center`].
  #[inline]
  pub fn bounding_radius(&self) -> f32 {
    (self.x.length() + self.y.length() + self.z.length()) * 0.5
  }

  /// The 8 corners, bit `i` of the index selecting edge `i`.
  pub fn corners(&self) -> [Vec3; 8] {
    let edges = [self.x, self.y, self.z];
    std::array::from_fn(|i| {
      (0..3).fold(self.corner, |p, axis| {
        if i & (1 << axis) != 0 {
          p + edges[axis]
        } else {
          p
        }
      })
    })
  }

  /// Axis-aligned box enclosing all 8 corners.
  pub fn calculate_aabb(&self) -> Aabb {
    let corners = self.corners();
    let (min, max) = corners[1..]
      .iter()
      .fold((corners[0], corners[0]), |(min, max), &c| (min.min(c), max.max(c)));
    Aabb { min, max }
  }

  /// Copy with a different max multiplier.
  #[inline]
  pub fn with_max_subdivision(self, multiplier: f32) -> Self {
    Self {
      max_subdivision_multiplier: multiplier,
      ..self
    }
  }
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;
