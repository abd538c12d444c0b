//! Axis-aligned bounding box used for renderer bounds and cell rasterization.

use glam::Vec3;

/// Axis-aligned bounding box.
///
/// Renderer bounds arrive from the host in this form, and the brick builder
/// rasterizes cells over the AABB enclosing their oriented volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb {
  /// Create a new AABB from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create an AABB from center and full size, as renderer bounds are reported.
  pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
    let half = size * 0.5;
    Self {
      min: center - half,
      max: center + half,
    }
  }

  /// AABB spanned by two opposite corners given in any order.
  ///
  /// Host bounds may arrive inverted; this never asserts.
  pub fn from_corners(a: Vec3, b: Vec3) -> Self {
    Self {
      min: a.min(b),
      max: a.max(b),
    }
  }

  /// Two AABBs overlap if they share any interior or boundary points.
  #[inline]
  pub fn overlaps(&self, other: &Aabb) -> bool {
    self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
  }

  #[inline]
  pub fn is_finite(&self) -> bool {
    self.min.is_finite() && self.max.is_finite()
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_center_size() {
    let aabb = Aabb::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
    assert_eq!(aabb.min, Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(aabb.max, Vec3::new(2.0, 4.0, 6.0));
    assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 6.0));
  }

  #[test]
  fn test_from_corners_orders_axes() {
    let aabb = Aabb::from_corners(Vec3::new(1.0, -1.0, 0.5), Vec3::new(-2.0, 3.0, -4.0));
    assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, -4.0));
    assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));

    let same = Aabb::from_corners(Vec3::splat(2.0), Vec3::splat(2.0));
    assert_eq!(same.size(), Vec3::ZERO);
  }

  #[test]
  fn test_overlaps_touching() {
    // Touching at boundary should count as overlapping
    let a = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
    let b = Aabb::new(Vec3::splat(10.0), Vec3::splat(20.0));
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
  }

  #[test]
  fn test_overlaps_false() {
    let a = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
    let b = Aabb::new(Vec3::new(11.0, 0.0, 0.0), Vec3::splat(20.0));
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
  }

  #[test]
  fn test_is_finite() {
    assert!(Aabb::new(Vec3::ZERO, Vec3::ONE).is_finite());
    let nan = Aabb {
      min: Vec3::ZERO,
      max: Vec3::new(f32::NAN, 1.0, 1.0),
    };
    assert!(!nan.is_finite());
    assert!(!Aabb::from_corners(Vec3::splat(f32::NEG_INFINITY), Vec3::ONE).is_finite());
  }
}
