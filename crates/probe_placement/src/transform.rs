//! Reference-volume transform.
//!
//! Reference space is the integer lattice bricks live on: one unit is the
//! minimum brick size, and a brick at level `l` spans `3^l` units. The
//! transform places that lattice in the world.

use glam::{Affine3A, Quat, Vec3};

/// Placement of the reference lattice in world space.
///
/// `ws_to_ref_space` is cached: the subdivision callback inverts every brick
/// it keeps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefVolTransform {
  /// World position of the lattice origin.
  pub position: Vec3,
  pub rotation: Quat,
  /// Minimum brick size in world units (uniform scale).
  pub scale: f32,
  /// Reference space → world space.
  pub ref_space_to_ws: Affine3A,
  /// World space → reference space.
  pub ws_to_ref_space: Affine3A,
}

impl RefVolTransform {
  pub fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
    let ref_space_to_ws = Affine3A::from_scale_rotation_translation(Vec3::splat(scale), rotation, position);
    Self {
      position,
      rotation,
      scale,
      ref_space_to_ws,
      ws_to_ref_space: ref_space_to_ws.inverse(),
    }
  }
}

impl Default for RefVolTransform {
  fn default() -> Self {
    Self::new(Vec3::ZERO, Quat::IDENTITY, 1.0)
  }
}
