use glam::{IVec3, Vec3};

use super::*;
use crate::test_utils::cube;

/// Depth policy of a reference volume with three levels below the coarsest.
fn depth(multiplier: f32) -> i32 {
  (3.0 * multiplier).ceil() as i32
}

fn cell() -> Volume {
  cube(Vec3::ZERO, 27.0)
}

fn indicator(corner: Vec3, size: f32, max_mul: f32, min_mul: f32) -> Volume {
  Volume {
    max_subdivision_multiplier: max_mul,
    min_subdivision_multiplier: min_mul,
    ..cube(corner, size)
  }
}

fn run(indicators: &[Volume], influences: &[Volume], bricks: &[Brick], level: i32) -> Vec<BrickFlags> {
  subdivision_algorithm(
    &cell(),
    indicators,
    influences,
    &RefVolTransform::default(),
    bricks,
    level,
    depth,
  )
}

const SUBDIVIDE_KEEP: BrickFlags = BrickFlags {
  subdivide: true,
  discard: false,
};

// =========================================================================
// Output shape
// =========================================================================

#[test]
fn test_one_flag_per_brick_in_order() {
  let ind = indicator(Vec3::ZERO, 3.0, 1.0, 1.0);
  let bricks = [
    Brick::new(IVec3::new(0, 0, 0), 1),
    Brick::new(IVec3::new(18, 18, 18), 1),
    Brick::new(IVec3::new(1, 1, 1), 0),
  ];

  let flags = run(&[ind], &[], &bricks, 1);

  assert_eq!(flags.len(), bricks.len());
  assert_eq!(flags[0], SUBDIVIDE_KEEP);
  assert_eq!(flags[1], BrickFlags::DISCARD);
  assert_eq!(flags[2], SUBDIVIDE_KEEP);
}

#[test]
fn test_empty_bricks() {
  assert!(run(&[], &[], &[], 0).is_empty());
}

#[test]
fn test_no_indicators_discards_everything() {
  let influence = cube(Vec3::ZERO, 27.0);
  let bricks = [Brick::new(IVec3::ZERO, 3), Brick::new(IVec3::new(3, 0, 0), 1)];

  for level in 0..=3 {
    let flags = run(&[], &[influence], &bricks, level);
    assert!(flags.iter().all(|f| *f == BrickFlags::DISCARD), "level {}", level);
  }
}

// =========================================================================
// Min multiplier: unconditional subdivision
// =========================================================================

/// A zero min multiplier still forces the coarsest pass.
#[test]
fn test_zero_min_forces_first_pass_only() {
  let ind = indicator(Vec3::ZERO, 27.0, 1.0, 0.0);
  let brick = [Brick::new(IVec3::ZERO, 3)];

  assert_eq!(run(&[ind], &[], &brick, 0), vec![SUBDIVIDE_KEEP]);
  assert_eq!(run(&[ind], &[], &[Brick::new(IVec3::ZERO, 2)], 1), vec![BrickFlags::DISCARD]);
}

#[test]
fn test_full_min_subdivides_without_geometry() {
  let ind = indicator(Vec3::ZERO, 27.0, 1.0, 1.0);
  for level in 0..=3 {
    let flags = run(&[ind], &[], &[Brick::new(IVec3::ZERO, 3 - level)], level);
    assert_eq!(flags, vec![SUBDIVIDE_KEEP], "level {}", level);
  }
}

/// Min multipliers of overlapping indicators combine by maximum.
#[test]
fn test_min_multiplier_accumulates_by_max() {
  let strong = indicator(Vec3::ZERO, 6.0, 1.0, 0.9);
  let weak = indicator(Vec3::ZERO, 6.0, 1.0, 0.0);
  let brick = [Brick::new(IVec3::ZERO, 1)];

  assert_eq!(run(&[weak, strong], &[], &brick, 2), vec![SUBDIVIDE_KEEP]);
  assert_eq!(run(&[strong, weak], &[], &brick, 2), vec![SUBDIVIDE_KEEP]);
  assert_eq!(run(&[weak], &[], &brick, 2), vec![BrickFlags::DISCARD]);
}

// =========================================================================
// Max multiplier: geometry-driven subdivision
// =========================================================================

#[test]
fn test_geometry_drives_subdivision_under_indicator() {
  let ind = indicator(Vec3::ZERO, 27.0, 1.0, 0.0);
  let mesh = cube(Vec3::new(4.0, 4.0, 4.0), 1.0);
  let near = Brick::new(IVec3::new(3, 3, 3), 1);
  let far = Brick::new(IVec3::new(18, 18, 18), 1);

  let flags = run(&[ind], &[mesh], &[near, far], 2);
  assert_eq!(flags, vec![SUBDIVIDE_KEEP, BrickFlags::DISCARD]);
}

#[test]
fn test_geometry_outside_indicator_ignored() {
  let ind = indicator(Vec3::ZERO, 3.0, 1.0, 0.0);
  let mesh = cube(Vec3::new(10.0, 10.0, 10.0), 1.0);
  let brick = [Brick::new(IVec3::new(9, 9, 9), 1)];

  assert_eq!(run(&[ind], &[mesh], &brick, 2), vec![BrickFlags::DISCARD]);
}

#[test]
fn test_max_multiplier_limits_depth() {
  // depth(0.3) = 1: passes 0 and 1 may follow geometry, pass 2 may not.
  let ind = indicator(Vec3::ZERO, 27.0, 0.3, 0.0);
  let mesh = cube(Vec3::ZERO, 27.0);
  let brick = [Brick::new(IVec3::ZERO, 1)];

  assert_eq!(run(&[ind], &[mesh], &brick, 1), vec![SUBDIVIDE_KEEP]);
  assert_eq!(run(&[ind], &[mesh], &brick, 2), vec![BrickFlags::DISCARD]);
}

/// Max multipliers combine by maximum over intersecting indicators only.
#[test]
fn test_local_max_ignores_distant_indicators() {
  let near = indicator(Vec3::ZERO, 6.0, 0.3, 0.0);
  let far = indicator(Vec3::splat(20.0), 6.0, 1.0, 0.0);
  let mesh = cube(Vec3::ZERO, 27.0);
  let brick = [Brick::new(IVec3::ZERO, 1)];

  assert_eq!(run(&[near, far], &[mesh], &brick, 2), vec![BrickFlags::DISCARD]);
}

// =========================================================================
// Cell containment
// =========================================================================

#[test]
fn test_brick_leaving_cell_is_discarded_but_split() {
  let ind = indicator(Vec3::splat(-30.0), 90.0, 1.0, 1.0);
  let bricks = [
    Brick::new(IVec3::new(24, 0, 0), 1),
    Brick::new(IVec3::new(25, 0, 0), 1),
    Brick::new(IVec3::new(-1, 0, 0), 1),
    Brick::new(IVec3::new(-27, 0, 0), 3),
  ];

  let flags = run(&[ind], &[], &bricks, 1);

  assert_eq!(flags[0], SUBDIVIDE_KEEP);
  for f in &flags[1..] {
    assert_eq!(*f, BrickFlags { subdivide: true, discard: true });
  }
}

fn containment_flags(cell: &Volume, brick: Brick) -> BrickFlags {
  let ind = indicator(Vec3::splat(-1.0), 30.0, 1.0, 1.0);
  subdivision_algorithm(cell, &[ind], &[], &RefVolTransform::default(), &[brick], 1, depth)[0]
}

/// Bricks flush with the cell faces stay.
#[test]
fn test_brick_on_cell_face_is_kept() {
  let cell = cube(Vec3::ZERO, 27.0);
  assert_eq!(containment_flags(&cell, Brick::new(IVec3::new(24, 24, 24), 1)), SUBDIVIDE_KEEP);
  assert_eq!(containment_flags(&cell, Brick::new(IVec3::ZERO, 1)), SUBDIVIDE_KEEP);
}

/// Overshoot within the 1e-4 slack is tolerated; anything past it is discarded.
#[test]
fn test_containment_slack_boundary() {
  let brick = Brick::new(IVec3::new(24, 0, 0), 1);

  let within = cube(Vec3::ZERO, 26.99995);
  assert_eq!(containment_flags(&within, brick), SUBDIVIDE_KEEP);

  let past = cube(Vec3::ZERO, 26.9998);
  assert_eq!(containment_flags(&past, brick), BrickFlags { subdivide: true, discard: true });

  let shifted = cube(Vec3::new(0.0002, 0.0, 0.0), 27.0);
  assert!(containment_flags(&shifted, Brick::new(IVec3::ZERO, 1)).discard);
}

/// Containment is judged in reference space, so a scaled lattice behaves the same.
#[test]
fn test_containment_with_scaled_lattice() {
  let transform = RefVolTransform::new(Vec3::new(100.0, 0.0, 0.0), glam::Quat::IDENTITY, 0.5);
  let cell = cube(Vec3::new(100.0, 0.0, 0.0), 13.5);
  let ind = indicator(Vec3::new(100.0, 0.0, 0.0), 13.5, 1.0, 1.0);
  let bricks = [Brick::new(IVec3::new(24, 24, 24), 1), Brick::new(IVec3::new(25, 0, 0), 1)];

  let flags = subdivision_algorithm(&cell, &[ind], &[], &transform, &bricks, 1, depth);

  assert_eq!(flags[0], SUBDIVIDE_KEEP);
  assert!(flags[1].discard);
}

// =========================================================================
// PlacementSubdivider
// =========================================================================

#[test]
fn test_placement_subdivider_matches_algorithm_and_counts() {
  let ind = indicator(Vec3::ZERO, 9.0, 1.0, 0.0);
  let mesh = cube(Vec3::ONE, 1.0);
  let indicators = [ind];
  let influences = [mesh];
  let bricks = [
    Brick::new(IVec3::ZERO, 1),
    Brick::new(IVec3::new(18, 0, 0), 1),
    Brick::new(IVec3::new(26, 0, 0), 1),
  ];

  let mut subdivider = PlacementSubdivider::new(cell(), &indicators, &influences, depth);
  let transform = RefVolTransform::default();

  let flags = subdivider.subdivide(&transform, 2, &bricks);
  assert_eq!(flags, run(&indicators, &influences, &bricks, 2));

  subdivider.subdivide(&transform, 3, &bricks[..1]);

  let stats = subdivider.stats();
  assert_eq!(stats.passes, 2);
  assert_eq!(stats.bricks_evaluated, 4);
  assert_eq!(stats.subdivided, 2);
  assert_eq!(stats.discarded, 2);
}

#[test]
fn test_closure_subdivider() {
  let mut calls = 0;
  let mut always_split = |_: &RefVolTransform, _: i32, bricks: &[Brick]| {
    calls += 1;
    vec![SUBDIVIDE_KEEP; bricks.len()]
  };

  let flags = Subdivider::subdivide(&mut always_split, &RefVolTransform::default(), 0, &[Brick::new(IVec3::ZERO, 1)]);
  assert_eq!(flags, vec![SUBDIVIDE_KEEP]);
  assert_eq!(calls, 1);
}
