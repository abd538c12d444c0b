//! Host-side scene data.
//!
//! The placement engine never walks a scene graph. The host flattens what it
//! knows about renderers and probe-volume markers into the plain records
//! below and passes them in; provenance flows back as [`SceneRefs`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Quat, Vec3};

use crate::aabb::Aabb;
use crate::volume::Volume;

// =============================================================================
// SceneId - opaque scene identity
// =============================================================================

/// Atomic counter for generating unique SceneIds.
static SCENE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque scene identifier.
///
/// Either generated (unique within the process) or wrapped from a host
/// handle with [`SceneId::from_raw`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
  /// Generate a new unique SceneId.
  pub fn new() -> Self {
    Self(SCENE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Wrap a host-provided scene handle.
  pub const fn from_raw(raw: u64) -> Self {
    Self(raw)
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for SceneId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// SceneRefs - per-scene contribution counts
// =============================================================================

/// Which scenes contributed volumes to a cell.
///
/// The first contribution from a scene records 0 and each later one adds 1,
/// so a stored value is "contributions - 1". Hosts only test membership or
/// compare counts, and they rely on exactly these values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneRefs(HashMap<SceneId, u32>);

impl SceneRefs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one contribution from `scene`.
  pub fn track(&mut self, scene: SceneId) {
    self
      .0
      .entry(scene)
      .and_modify(|count| *count += 1)
      .or_insert(0);
  }

  pub fn get(&self, scene: SceneId) -> Option<u32> {
    self.0.get(&scene).copied()
  }

  pub fn contains(&self, scene: SceneId) -> bool {
    self.0.contains_key(&scene)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (SceneId, u32)> + '_ {
    self.0.iter().map(|(scene, count)| (*scene, *count))
  }

  /// Entries sorted by scene id, for stable output across the FFI boundary.
  pub fn to_sorted_vec(&self) -> Vec<(SceneId, u32)> {
    let mut entries: Vec<_> = self.iter().collect();
    entries.sort_unstable_by_key(|(scene, _)| *scene);
    entries
  }
}

// =============================================================================
// Host records
// =============================================================================

/// A renderer as the host sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererSource {
  /// World-space bounds.
  pub bounds: Aabb,
  pub enabled: bool,
  /// The owning object's own active flag (ignores parents).
  pub active_self: bool,
  /// Marked as contributing to global illumination.
  pub contributes_gi: bool,
  pub scene: SceneId,
}

impl RendererSource {
  /// Only enabled, active, GI-contributing renderers with finite bounds
  /// influence placement.
  #[inline]
  pub fn contributes(&self) -> bool {
    self.enabled && self.active_self && self.contributes_gi && self.bounds.is_finite()
  }
}

/// A probe-volume marker as the host sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorSource {
  pub position: Vec3,
  pub rotation: Quat,
  /// Full size along each local axis.
  pub extents: Vec3,
  pub max_subdivision_multiplier: f32,
  pub min_subdivision_multiplier: f32,
  /// Component enabled flag.
  pub enabled: bool,
  /// Object active including all parents.
  pub active_in_hierarchy: bool,
  pub scene: SceneId,
}

impl IndicatorSource {
  #[inline]
  pub fn is_active_and_enabled(&self) -> bool {
    self.enabled && self.active_in_hierarchy
  }

  /// Indicator volume centered on the marker.
  pub fn to_volume(&self) -> Volume {
    Volume::from_trs(
      self.position,
      self.rotation,
      self.extents,
      self.max_subdivision_multiplier,
      self.min_subdivision_multiplier,
    )
  }
}

// =============================================================================
// SceneQuery - marker lookup at subdivision time
// =============================================================================

/// Lists the probe-volume markers currently present in the host scene.
///
/// Implementations return markers on active objects only, whether or not the
/// marker component itself is enabled.
pub trait SceneQuery {
  fn list_active_markers(&self) -> Vec<IndicatorSource>;
}

impl SceneQuery for [IndicatorSource] {
  fn list_active_markers(&self) -> Vec<IndicatorSource> {
    self
      .iter()
      .filter(|m| m.active_in_hierarchy)
      .copied()
      .collect()
  }
}

impl SceneQuery for Vec<IndicatorSource> {
  fn list_active_markers(&self) -> Vec<IndicatorSource> {
    self.as_slice().list_active_markers()
  }
}
