//! Separating-axis intersection test for oriented volumes.
//!
//! Two convex boxes are disjoint iff some axis separates their projections.
//! For boxes the candidate axes are the 3 edge directions of each box plus
//! the 9 cross products between them. Each box projects onto an axis `n` as
//! an interval centered on `center · n` with radius `Σ |h_i · n|` over its
//! half-edges `h_i`, so no corner enumeration is needed.

use glam::Vec3;

use crate::volume::Volume;

/// Squared sine of the angle under which two edges count as parallel.
///
/// Their cross product then carries no direction and yields no axis.
const PARALLEL_SIN_SQ: f32 = 1e-10;

/// True iff the two volumes overlap or touch.
#[inline]
pub fn obb_intersect(a: &Volume, b: &Volume) -> bool {
  let delta = b.center() - a.center();

  // Bounding spheres first: most calls in a subdivision pass are far apart.
  let radius = a.bounding_radius() + b.bounding_radius();
  if delta.length_squared() > radius * radius {
    return false;
  }

  let half_a = [a.x * 0.5, a.y * 0.5, a.z * 0.5];
  let half_b = [b.x * 0.5, b.y * 0.5, b.z * 0.5];

  // Zero-length edges (flat volumes) contribute nothing.
  for edge in half_a.iter().chain(half_b.iter()) {
    if *edge != Vec3::ZERO && separates(*edge, delta, &half_a, &half_b) {
      return false;
    }
  }

  for ea in &half_a {
    for eb in &half_b {
      let axis = ea.cross(*eb);
      let scale = ea.length_squared() * eb.length_squared();
      if axis.length_squared() <= scale * PARALLEL_SIN_SQ {
        continue;
      }
      if separates(axis, delta, &half_a, &half_b) {
        return false;
      }
    }
  }

  true
}

/// Projected center distance strictly exceeds the summed projected radii.
///
/// The axis is left unnormalized: both sides scale by the same factor.
#[inline]
fn separates(axis: Vec3, delta: Vec3, half_a: &[Vec3; 3], half_b: &[Vec3; 3]) -> bool {
  let project = |half: &[Vec3; 3]| half.iter().map(|h| h.dot(axis).abs()).sum::<f32>();
  delta.dot(axis).abs() > project(half_a) + project(half_b)
}

#[cfg(test)]
#[path = "obb_test.rs"]
mod obb_test;
