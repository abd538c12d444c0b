//! Fixtures shared by the unit tests.

use glam::{Quat, Vec3};

use crate::aabb::Aabb;
use crate::config::ReferenceVolumeConfig;
use crate::constants::cell_size;
use crate::reference_volume::ReferenceVolume;
use crate::scene::{IndicatorSource, RendererSource, SceneId};
use crate::volume::Volume;

pub const SCENE_A: SceneId = SceneId::from_raw(100);
pub const SCENE_B: SceneId = SceneId::from_raw(200);

/// Axis-aligned cube.
pub fn cube(corner: Vec3, size: f32) -> Volume {
  Volume::new(corner, Vec3::X * size, Vec3::Y * size, Vec3::Z * size)
}

/// Axis-aligned cell spanning one coarsest brick of `reference`, at the origin.
pub fn origin_cell(reference: &ReferenceVolume) -> Volume {
  let size = cell_size(reference.config().max_subdivision) as f32 * reference.config().min_brick_size;
  cube(Vec3::ZERO, size)
}

/// Renderer with every contribution flag set.
pub fn renderer(center: Vec3, size: Vec3, scene: SceneId) -> RendererSource {
  RendererSource {
    bounds: Aabb::from_center_size(center, size),
    enabled: true,
    active_self: true,
    contributes_gi: true,
    scene,
  }
}

/// Enabled, active, axis-aligned marker.
pub fn marker(center: Vec3, extents: Vec3, max_mul: f32, min_mul: f32, scene: SceneId) -> IndicatorSource {
  IndicatorSource {
    position: center,
    rotation: Quat::IDENTITY,
    extents,
    max_subdivision_multiplier: max_mul,
    min_subdivision_multiplier: min_mul,
    enabled: true,
    active_in_hierarchy: true,
    scene,
  }
}

/// Identity-placed reference volume with unit minimum bricks.
pub fn unit_reference_volume(max_subdivision: i32) -> ReferenceVolume {
  ReferenceVolume::new(ReferenceVolumeConfig {
    max_subdivision,
    ..Default::default()
  })
}
