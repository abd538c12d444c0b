use glam::{IVec3, Vec3};

use super::*;
use crate::constants::BRICK_PROBE_COUNT_TOTAL;
use crate::scene::IndicatorSource;
use crate::test_utils::*;

#[test]
fn test_no_markers_no_bricks() {
  let rv = unit_reference_volume(2);
  let cell = origin_cell(&rv);
  let markers: Vec<IndicatorSource> = Vec::new();

  let out = subdivide(&cell, &rv, &markers, &[cube(Vec3::ZERO, 9.0)]);

  assert!(out.bricks.is_empty());
  assert!(out.positions.is_empty());
  assert_eq!(out.probe_count, 0);
  assert_eq!(out.stats.passes, 1);
}

#[test]
fn test_min_multiplier_fills_cell() {
  let rv = unit_reference_volume(1);
  let cell = origin_cell(&rv);
  let markers = vec![marker(Vec3::splat(1.5), Vec3::splat(3.0), 1.0, 1.0, SCENE_A)];

  let out = subdivide(&cell, &rv, &markers, &[]);

  assert_eq!(out.bricks.len(), 28);
  assert_eq!(out.probe_count, 28 * BRICK_PROBE_COUNT_TOTAL);
  assert_eq!(out.positions.len(), out.probe_count);
  assert_eq!(out.stats.passes, 2);
  assert_eq!(out.stats.bricks_evaluated, 28);
}

#[test]
fn test_geometry_refines_locally() {
  let rv = unit_reference_volume(2);
  let cell = origin_cell(&rv);
  let markers = vec![marker(Vec3::splat(4.5), Vec3::splat(9.0), 1.0, 0.0, SCENE_A)];
  let mesh = cube(Vec3::splat(1.2), 0.6);

  let out = subdivide(&cell, &rv, &markers, &[mesh]);

  assert_eq!(
    out.bricks,
    vec![
      Brick::new(IVec3::ZERO, 2),
      Brick::new(IVec3::ZERO, 1),
      Brick::new(IVec3::ONE, 0),
    ]
  );
  assert_eq!(out.positions.len(), 3 * BRICK_PROBE_COUNT_TOTAL);
  // Finest brick probes span [1, 2] at thirds.
  assert_eq!(out.positions[128], Vec3::ONE);
  assert_eq!(out.positions[191], Vec3::splat(2.0));
}

/// Disabled markers are ignored even though the scene lists them.
#[test]
fn test_disabled_marker_ignored() {
  let rv = unit_reference_volume(1);
  let cell = origin_cell(&rv);
  let mut m = marker(Vec3::splat(1.5), Vec3::splat(3.0), 1.0, 1.0, SCENE_A);
  m.enabled = false;

  let out = subdivide(&cell, &rv, &vec![m], &[]);
  assert!(out.bricks.is_empty());
}

/// Markers on inactive objects are never listed by the scene.
#[test]
fn test_inactive_marker_ignored() {
  let rv = unit_reference_volume(1);
  let cell = origin_cell(&rv);
  let mut m = marker(Vec3::splat(1.5), Vec3::splat(3.0), 1.0, 1.0, SCENE_A);
  m.active_in_hierarchy = false;

  let out = subdivide(&cell, &rv, [m].as_slice(), &[]);
  assert!(out.bricks.is_empty());
}

/// Markers outside the cell still count: the scene is queried as a whole.
#[test]
fn test_marker_outside_cell_only_shapes_its_area() {
  let rv = unit_reference_volume(1);
  let cell = origin_cell(&rv);
  let markers = vec![
    marker(Vec3::splat(1.5), Vec3::splat(3.0), 1.0, 1.0, SCENE_A),
    marker(Vec3::splat(50.0), Vec3::splat(3.0), 1.0, 1.0, SCENE_B),
  ];

  let out = subdivide(&cell, &rv, &markers, &[]);
  assert_eq!(out.bricks.len(), 28);
}
