//! Unity FFI bridge for probe_placement v0.1.
//!
//! Rust owns brick subdivision and probe positioning - C# only flattens its
//! scene into renderer and marker records and reads back positions. Key
//! features:
//! - Handle-based reference volumes created from a plain config struct
//! - One call per cell, or one call per batch of cells placed on rayon
//! - Results retained on the Rust side; C# reads them through raw pointers
//! - Engine-agnostic metrics collection via `metrics` feature
//!
//! # Architecture
//!
//! ```text
//! C# (Unity)                           Rust (probe_placement_unity)
//! ┌───────────────────┐                ┌──────────────────────────────┐
//! │ ProbePlacement    │                │ ReferenceVolumeState         │
//! │                   │                │  - reference: ReferenceVolume│
//! │ Bake():           │  probe_        │  - retained: Vec<Retained..> │
//! │   renderers  ─────┼──placement_──► │  - metrics: PlacementMetrics │
//! │   markers         │  place_cell()  │                              │
//! │                   │ ◄──────────────│ place_cell():                │
//! │ Upload():         │  FfiCell       │  1. Extract + cull volumes   │
//! │   positions       │  Result        │  2. Subdivide into bricks    │
//! │   bricks          │                │  3. Retain output buffers    │
//! └───────────────────┘                └──────────────────────────────┘
//! ```
//!
//! # Metrics
//!
//! Call `probe_placement_get_metrics()` to retrieve timing statistics:
//! - Extraction timing (avg, min, max, last from 128-sample window)
//! - Subdivision timing (same)
//! - Cumulative counts (cells, bricks, probes, scene contributions)

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use glam::{Quat, Vec3};

use probe_placement::{
    place_probes, place_probes_parallel, Aabb, Brick, CellPlacement, IndicatorSource,
    PlacementMetrics, ReferenceVolume, ReferenceVolumeConfig, RendererSource, SceneId, Volume,
};

// =============================================================================
// FFI Types - Inputs
// =============================================================================

/// Reference volume configuration passed from Unity.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FfiReferenceVolumeConfig {
    /// World size of the smallest brick
    pub min_brick_size: f32,
    /// Coarsest brick level (0..15)
    pub max_subdivision: i32,
    /// Lattice origin in world space
    pub position: [f32; 3],
    /// Lattice rotation as quaternion x, y, z, w
    pub rotation: [f32; 4],
}

impl From<&FfiReferenceVolumeConfig> for ReferenceVolumeConfig {
    fn from(cfg: &FfiReferenceVolumeConfig) -> Self {
        Self {
            min_brick_size: cfg.min_brick_size,
            max_subdivision: cfg.max_subdivision,
            position: Vec3::from_array(cfg.position),
            rotation: Quat::from_array(cfg.rotation),
        }
    }
}

/// Oriented box: corner plus three edge vectors.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct FfiVolume {
    pub corner: [f32; 3],
    pub x: [f32; 3],
    pub y: [f32; 3],
    pub z: [f32; 3],
    pub max_subdivision_multiplier: f32,
    pub min_subdivision_multiplier: f32,
}

impl From<&FfiVolume> for Volume {
    fn from(v: &FfiVolume) -> Self {
        Volume {
            corner: Vec3::from_array(v.corner),
            x: Vec3::from_array(v.x),
            y: Vec3::from_array(v.y),
            z: Vec3::from_array(v.z),
            max_subdivision_multiplier: v.max_subdivision_multiplier,
            min_subdivision_multiplier: v.min_subdivision_multiplier,
        }
    }
}

/// Renderer record. Flags are 0 = false, anything else = true.
/// Bounds may be given in either corner order; non-finite bounds are ignored.
/// Matches C# FfiRenderer exactly.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct FfiRenderer {
    /// Host scene handle
    pub scene: u64,
    /// World bounds min
    pub min: [f32; 3],
    /// World bounds max
    pub max: [f32; 3],
    pub enabled: u8,
    pub active_self: u8,
    pub contributes_gi: u8,
    pub _pad: u8,
}

impl From<&FfiRenderer> for RendererSource {
    fn from(r: &FfiRenderer) -> Self {
        RendererSource {
            bounds: Aabb::from_corners(Vec3::from_array(r.min), Vec3::from_array(r.max)),
            enabled: r.enabled != 0,
            active_self: r.active_self != 0,
            contributes_gi: r.contributes_gi != 0,
            scene: SceneId::from_raw(r.scene),
        }
    }
}

/// Probe-volume marker record.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct FfiProbeVolumeMarker {
    /// Host scene handle
    pub scene: u64,
    pub position: [f32; 3],
    /// Quaternion x, y, z, w
    pub rotation: [f32; 4],
    /// Full size along each local axis
    pub extents: [f32; 3],
    pub max_subdivision_multiplier: f32,
    pub min_subdivision_multiplier: f32,
    pub enabled: u8,
    pub active_in_hierarchy: u8,
    pub _pad: [u8; 2],
}

impl From<&FfiProbeVolumeMarker> for IndicatorSource {
    fn from(m: &FfiProbeVolumeMarker) -> Self {
        IndicatorSource {
            position: Vec3::from_array(m.position),
            rotation: Quat::from_array(m.rotation),
            extents: Vec3::from_array(m.extents),
            max_subdivision_multiplier: m.max_subdivision_multiplier,
            min_subdivision_multiplier: m.min_subdivision_multiplier,
            enabled: m.enabled != 0,
            active_in_hierarchy: m.active_in_hierarchy != 0,
            scene: SceneId::from_raw(m.scene),
        }
    }
}

// =============================================================================
// FFI Types - Outputs
// =============================================================================

/// Brick in reference-volume space.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FfiBrick {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub subdivision_level: i32,
}

impl From<&Brick> for FfiBrick {
    fn from(brick: &Brick) -> Self {
        Self {
            x: brick.position.x,
            y: brick.position.y,
            z: brick.position.z,
            subdivision_level: brick.subdivision_level,
        }
    }
}

/// Scene that contributed to a cell, with its reference count.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FfiSceneRef {
    pub scene: u64,
    /// 0 for a single contribution, +1 per additional one
    pub count: u32,
    pub _pad: u32,
}

/// Placement result for one cell.
/// Pointers are valid until the next place call on the same handle or destroy.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FfiCellResult {
    /// Pointer to probe positions (xyz triples), 64 per brick
    pub positions_ptr: *const [f32; 3],
    pub positions_count: u32,
    /// Probe count reported by the brick builder
    pub probe_count: u32,
    /// Pointer to kept bricks, coarsest level first
    pub bricks_ptr: *const FfiBrick,
    pub bricks_count: u32,
    /// Influence volumes that survived culling
    pub culled_volume_count: u32,
    /// Pointer to contributing scenes, sorted by scene handle
    pub scene_refs_ptr: *const FfiSceneRef,
    pub scene_refs_count: u32,
    /// Cell max multiplier after markers raised it
    pub cell_max_subdivision_multiplier: f32,
    pub extraction_us: u64,
    pub subdivision_us: u64,
}

impl FfiCellResult {
    fn empty() -> Self {
        Self {
            positions_ptr: std::ptr::null(),
            positions_count: 0,
            probe_count: 0,
            bricks_ptr: std::ptr::null(),
            bricks_count: 0,
            culled_volume_count: 0,
            scene_refs_ptr: std::ptr::null(),
            scene_refs_count: 0,
            cell_max_subdivision_multiplier: 0.0,
            extraction_us: 0,
            subdivision_us: 0,
        }
    }
}

/// Results of a batch call, one per input cell in input order.
#[repr(C)]
pub struct FfiCellBatch {
    pub cells: *const FfiCellResult,
    pub cells_count: u32,
    pub _pad: u32,
}

// SAFETY: FFI types contain raw pointers that are only valid within a single
// FFI call context. The ReferenceVolumeState owns all backing data, so
// pointers remain valid as long as the handle lives. These are not actually
// sent between threads - the Mutex guards ensure single-threaded access.
unsafe impl Send for FfiCellResult {}
unsafe impl Sync for FfiCellResult {}
unsafe impl Send for FfiCellBatch {}
unsafe impl Sync for FfiCellBatch {}

// =============================================================================
// FFI Metrics Types
// =============================================================================

/// Timing histogram stats (from RollingWindow).
///
/// Each timing category provides these computed statistics from a 128-sample
/// rolling window.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct FfiTimingStats {
    /// Most recent sample in microseconds.
    pub last_us: u64,
    /// Mean of window in microseconds.
    pub avg_us: u64,
    pub min_us: u64,
    pub max_us: u64,
    /// Number of samples in window (up to 128).
    pub sample_count: u32,
    pub _pad: u32,
}

impl From<probe_placement::metrics::TimingStats> for FfiTimingStats {
    fn from(stats: probe_placement::metrics::TimingStats) -> Self {
        Self {
            last_us: stats.last_us,
            avg_us: stats.avg_us,
            min_us: stats.min_us,
            max_us: stats.max_us,
            sample_count: stats.sample_count,
            _pad: 0,
        }
    }
}

/// Rust-side metrics snapshot for FFI export.
/// Access via `probe_placement_get_metrics()`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct FfiMetricsSnapshot {
    // Timing histograms
    pub extraction: FfiTimingStats,
    pub subdivision: FfiTimingStats,

    // Cumulative counts
    pub total_cells: u64,
    pub total_bricks: u64,
    pub total_probes: u64,
    /// Scene contributions summed over cells.
    pub total_scene_refs: u64,
}

// =============================================================================
// Reference Volume State
// =============================================================================

/// Output buffers of one cell, retained for pointer validity.
struct RetainedCell {
    positions: Vec<[f32; 3]>,
    bricks: Vec<FfiBrick>,
    scene_refs: Vec<FfiSceneRef>,
    probe_count: u32,
    culled_volume_count: u32,
    cell_max_subdivision_multiplier: f32,
    extraction_us: u64,
    subdivision_us: u64,
}

/// Element count for the C side, saturating at `u32::MAX`.
///
/// A saturated count never exceeds the buffer length, so C# reads a prefix.
fn ffi_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl From<&CellPlacement> for RetainedCell {
    fn from(placement: &CellPlacement) -> Self {
        Self {
            positions: placement.subdivision.positions.iter().map(|p| p.to_array()).collect(),
            bricks: placement.subdivision.bricks.iter().map(FfiBrick::from).collect(),
            scene_refs: placement
                .extraction
                .scene_refs
                .to_sorted_vec()
                .into_iter()
                .map(|(scene, count)| FfiSceneRef {
                    scene: scene.raw(),
                    count,
                    _pad: 0,
                })
                .collect(),
            probe_count: ffi_count(placement.subdivision.probe_count),
            culled_volume_count: ffi_count(placement.extraction.culled_volumes.len()),
            cell_max_subdivision_multiplier: placement.extraction.cell_volume.max_subdivision_multiplier,
            extraction_us: placement.timings.extraction_us,
            subdivision_us: placement.timings.subdivision_us,
        }
    }
}

impl RetainedCell {
    /// Build the FFI view. Pointers borrow from `self`.
    fn to_ffi(&self) -> FfiCellResult {
        FfiCellResult {
            positions_ptr: if self.positions.is_empty() {
                std::ptr::null()
            } else {
                self.positions.as_ptr()
            },
            positions_count: ffi_count(self.positions.len()),
            probe_count: self.probe_count,
            bricks_ptr: if self.bricks.is_empty() {
                std::ptr::null()
            } else {
                self.bricks.as_ptr()
            },
            bricks_count: ffi_count(self.bricks.len()),
            culled_volume_count: self.culled_volume_count,
            scene_refs_ptr: if self.scene_refs.is_empty() {
                std::ptr::null()
            } else {
                self.scene_refs.as_ptr()
            },
            scene_refs_count: ffi_count(self.scene_refs.len()),
            cell_max_subdivision_multiplier: self.cell_max_subdivision_multiplier,
            extraction_us: self.extraction_us,
            subdivision_us: self.subdivision_us,
        }
    }
}

/// Internal state behind a reference volume handle.
struct ReferenceVolumeState {
    reference: ReferenceVolume,
    /// Output of the last place call (retained for pointer validity)
    retained: Vec<RetainedCell>,
    /// FFI views (built from retained, points into their data)
    ffi_cells: Vec<FfiCellResult>,
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    metrics: PlacementMetrics,
}

impl ReferenceVolumeState {
    fn new(reference: ReferenceVolume) -> Self {
        Self {
            reference,
            retained: Vec::new(),
            ffi_cells: Vec::new(),
            metrics: PlacementMetrics::new(),
        }
    }

    /// Replace retained output with `placements` and rebuild the FFI views.
    fn retain(&mut self, placements: &[CellPlacement]) {
        #[cfg(feature = "metrics")]
        for placement in placements {
            self.metrics.record_cell(placement);
        }

        // Views must be rebuilt after all cells are stored for pointer stability
        self.retained = placements.iter().map(RetainedCell::from).collect();
        self.ffi_cells = self.retained.iter().map(RetainedCell::to_ffi).collect();
    }
}

// =============================================================================
// Input Conversion
// =============================================================================

/// Copy `count` host records into engine records.
///
/// # Safety
/// `ptr` must point to `count` valid records, or be null when `count` is 0.
unsafe fn read_records<F, T>(ptr: *const F, count: u32) -> Option<Vec<T>>
where
    T: for<'r> From<&'r F>,
{
    if count == 0 {
        return Some(Vec::new());
    }
    if ptr.is_null() {
        return None;
    }
    let records: &[F] = std::slice::from_raw_parts(ptr, count as usize);
    Some(records.iter().map(T::from).collect())
}

// =============================================================================
// Global Handle Storage
// =============================================================================

/// Global reference volume storage with thread-safe access.
static REFERENCE_VOLUMES: Mutex<Option<HashMap<i32, ReferenceVolumeState>>> = Mutex::new(None);
static NEXT_HANDLE: AtomicI32 = AtomicI32::new(1);

// =============================================================================
// FFI Functions
// =============================================================================

/// Returns the library version as a packed u32: 0xMMmmpp (major.minor.patch).
#[no_mangle]
pub extern "C" fn probe_placement_version() -> u32 {
    0x000100 // v0.1.0
}

/// Size the global rayon pool used by batch placement.
///
/// Must be called before the first batch call; later calls fail.
///
/// # Returns
/// - 0 on success
/// - -6 if the pool was already initialized
#[no_mangle]
pub extern "C" fn probe_placement_set_thread_count(threads: u32) -> i32 {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads as usize)
        .build_global()
    {
        Ok(()) => 0,
        Err(_) => -6,
    }
}

/// Create a reference volume.
///
/// # Safety
/// - `config` must point to a valid FfiReferenceVolumeConfig struct.
///
/// # Returns
/// - Positive handle on success
/// - -1 if config is null
/// - -2 if failed to acquire lock
/// - -5 if the configuration is invalid
#[no_mangle]
pub unsafe extern "C" fn probe_reference_volume_create(config: *const FfiReferenceVolumeConfig) -> i32 {
    if config.is_null() {
        return -1;
    }

    let config = ReferenceVolumeConfig::from(&*config);
    if config.validate().is_err() {
        return -5;
    }

    let state = ReferenceVolumeState::new(ReferenceVolume::new(config));

    let Ok(mut guard) = REFERENCE_VOLUMES.lock() else {
        return -2;
    };

    let volumes = guard.get_or_insert_with(HashMap::new);

    let handle = NEXT_HANDLE.fetch_add(1, Ordering::SeqCst);
    volumes.insert(handle, state);

    handle
}

/// Place probes in one cell.
///
/// # Safety
/// - `cell` must point to a valid FfiVolume.
/// - `renderers` must point to `renderer_count` records (may be null if 0).
/// - `markers` must point to `marker_count` records (may be null if 0).
/// - `out` must point to a valid FfiCellResult struct.
///
/// # Returns
/// - 0 on success
/// - -1 if a required pointer is null
/// - -2 if failed to acquire lock
/// - -3 if handle not found
#[no_mangle]
pub unsafe extern "C" fn probe_placement_place_cell(
    handle: i32,
    cell: *const FfiVolume,
    renderers: *const FfiRenderer,
    renderer_count: u32,
    markers: *const FfiProbeVolumeMarker,
    marker_count: u32,
    out: *mut FfiCellResult,
) -> i32 {
    if out.is_null() || cell.is_null() {
        return -1;
    }

    let cell = Volume::from(&*cell);
    let Some(renderers) = read_records::<_, RendererSource>(renderers, renderer_count) else {
        return -1;
    };
    let Some(markers) = read_records::<_, IndicatorSource>(markers, marker_count) else {
        return -1;
    };

    let Ok(mut guard) = REFERENCE_VOLUMES.lock() else {
        return -2;
    };

    let Some(ref mut volumes) = *guard else {
        return -3;
    };

    let Some(state) = volumes.get_mut(&handle) else {
        return -3;
    };

    let placement = place_probes(&cell, &state.reference, markers.as_slice(), &renderers, &markers);
    state.retain(std::slice::from_ref(&placement));

    (*out) = match state.ffi_cells.first() {
        Some(result) => *result,
        None => FfiCellResult::empty(),
    };

    0
}

/// Place probes in many cells on the rayon pool.
///
/// # Safety
/// - `cells` must point to `cell_count` FfiVolume records (may be null if 0).
/// - `renderers` and `markers` as for `probe_placement_place_cell`.
/// - `out` must point to a valid FfiCellBatch struct.
///
/// # Returns
/// - 0 on success
/// - -1 if a required pointer is null
/// - -2 if failed to acquire lock
/// - -3 if handle not found
#[no_mangle]
pub unsafe extern "C" fn probe_placement_place_cells(
    handle: i32,
    cells: *const FfiVolume,
    cell_count: u32,
    renderers: *const FfiRenderer,
    renderer_count: u32,
    markers: *const FfiProbeVolumeMarker,
    marker_count: u32,
    out: *mut FfiCellBatch,
) -> i32 {
    if out.is_null() {
        return -1;
    }

    let Some(cells) = read_records::<_, Volume>(cells, cell_count) else {
        return -1;
    };
    let Some(renderers) = read_records::<_, RendererSource>(renderers, renderer_count) else {
        return -1;
    };
    let Some(markers) = read_records::<_, IndicatorSource>(markers, marker_count) else {
        return -1;
    };

    let Ok(mut guard) = REFERENCE_VOLUMES.lock() else {
        return -2;
    };

    let Some(ref mut volumes) = *guard else {
        return -3;
    };

    let Some(state) = volumes.get_mut(&handle) else {
        return -3;
    };

    let placements = place_probes_parallel(&cells, &state.reference, markers.as_slice(), &renderers, &markers);
    state.retain(&placements);

    (*out) = FfiCellBatch {
        cells: if state.ffi_cells.is_empty() {
            std::ptr::null()
        } else {
            state.ffi_cells.as_ptr()
        },
        cells_count: ffi_count(state.ffi_cells.len()),
        _pad: 0,
    };

    0
}

/// Destroy a reference volume and free its retained buffers.
///
/// # Returns
/// - 0 on success
/// - -2 if failed to acquire lock
/// - -3 if handle not found
#[no_mangle]
pub extern "C" fn probe_reference_volume_destroy(handle: i32) -> i32 {
    let Ok(mut guard) = REFERENCE_VOLUMES.lock() else {
        return -2;
    };

    let Some(ref mut volumes) = *guard else {
        return -3;
    };

    if volumes.remove(&handle).is_some() {
        0
    } else {
        -3
    }
}

/// Get current metrics snapshot for a reference volume.
///
/// Stats are computed from a 128-sample rolling window.
///
/// # Safety
/// - `out` must point to a valid FfiMetricsSnapshot struct.
///
/// # Returns
/// - 0 on success
/// - -1 if out is null
/// - -2 if failed to acquire lock
/// - -3 if handle not found
/// - -4 if metrics feature not enabled (compile-time)
#[no_mangle]
pub unsafe extern "C" fn probe_placement_get_metrics(handle: i32, out: *mut FfiMetricsSnapshot) -> i32 {
    #[cfg(not(feature = "metrics"))]
    {
        let _ = (handle, out);
        return -4; // Metrics not enabled
    }

    #[cfg(feature = "metrics")]
    {
        if out.is_null() {
            return -1;
        }

        let Ok(guard) = REFERENCE_VOLUMES.lock() else {
            return -2;
        };

        let Some(ref volumes) = *guard else {
            return -3;
        };

        let Some(state) = volumes.get(&handle) else {
            return -3;
        };

        let snapshot = state.metrics.snapshot();

        (*out) = FfiMetricsSnapshot {
            extraction: snapshot.extraction.into(),
            subdivision: snapshot.subdivision.into(),
            total_cells: snapshot.total_cells,
            total_bricks: snapshot.total_bricks,
            total_probes: snapshot.total_probes,
            total_scene_refs: snapshot.total_scene_refs,
        };

        0
    }
}

// =============================================================================
// Tests
// =============================================================================
