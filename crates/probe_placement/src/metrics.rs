//! Engine-agnostic metrics collection for probe placement.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use probe_placement::metrics::{PlacementMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Record each placed cell:
//! metrics.record_cell(&placement);
//!
//! // Read back for display:
//! let snapshot = metrics.snapshot();
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::constants::MAX_SUBDIVISION_LEVELS;
use crate::pipeline::CellPlacement;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl RollingWindow<u64> {
    pub fn sum(&self) -> u64 {
        self.buffer.iter().sum()
    }

    /// Compute the average of all values.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Get min and max values.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = *self.buffer.iter().min()?;
        let max = *self.buffer.iter().max()?;
        Some((min, max))
    }

    /// Summary statistics over the window.
    pub fn stats(&self) -> TimingStats {
        let (min_us, max_us) = self.min_max().unwrap_or((0, 0));
        TimingStats {
            last_us: self.last().copied().unwrap_or(0),
            avg_us: self.average().round() as u64,
            min_us,
            max_us,
            sample_count: self.len() as u32,
        }
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(TIMING_WINDOW)
    }
}

/// Samples kept per timing window.
pub const TIMING_WINDOW: usize = 128;

/// Levels tracked in the per-level brick histogram.
pub const TRACKED_LEVELS: usize = MAX_SUBDIVISION_LEVELS as usize + 1;

/// Summary of one timing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingStats {
    /// Most recent sample in microseconds.
    pub last_us: u64,
    /// Mean of window in microseconds.
    pub avg_us: u64,
    pub min_us: u64,
    pub max_us: u64,
    /// Number of samples in window (up to 128).
    pub sample_count: u32,
}

/// Point-in-time copy of [`PlacementMetrics`] for display or FFI export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub extraction: TimingStats,
    pub subdivision: TimingStats,
    pub total_cells: u64,
    pub total_bricks: u64,
    pub total_probes: u64,
    pub total_scene_refs: u64,
}

/// Placement statistics accumulated over a session.
#[derive(Debug, Clone)]
pub struct PlacementMetrics {
    // Brick distribution
    /// Kept bricks at each subdivision level (index = level).
    pub bricks_per_level: [u64; TRACKED_LEVELS],

    // Timing
    /// Rolling window of extraction times in microseconds.
    pub extraction_timings: RollingWindow<u64>,
    /// Rolling window of subdivision times in microseconds.
    pub subdivision_timings: RollingWindow<u64>,

    // Cumulative counts
    pub total_cells: u64,
    pub total_bricks: u64,
    pub total_probes: u64,
    /// Scene contributions summed over cells.
    pub total_scene_refs: u64,
}

impl Default for PlacementMetrics {
    fn default() -> Self {
        Self {
            bricks_per_level: [0; TRACKED_LEVELS],
            extraction_timings: RollingWindow::new(TIMING_WINDOW),
            subdivision_timings: RollingWindow::new(TIMING_WINDOW),
            total_cells: 0,
            total_bricks: 0,
            total_probes: 0,
            total_scene_refs: 0,
        }
    }
}

impl PlacementMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear timing windows and the brick histogram.
    pub fn reset(&mut self) {
        self.bricks_per_level.fill(0);
        self.extraction_timings.clear();
        self.subdivision_timings.clear();
        // Don't reset totals - they're cumulative
    }

    pub fn record_extraction_timing(&mut self, timing_us: u64) {
        if is_enabled() {
            self.extraction_timings.push(timing_us);
        }
    }

    pub fn record_subdivision_timing(&mut self, timing_us: u64) {
        if is_enabled() {
            self.subdivision_timings.push(timing_us);
        }
    }

    /// Record timings and counts of one placed cell.
    pub fn record_cell(&mut self, placement: &CellPlacement) {
        if !is_enabled() {
            return;
        }

        self.record_extraction_timing(placement.timings.extraction_us);
        self.record_subdivision_timing(placement.timings.subdivision_us);

        for brick in &placement.subdivision.bricks {
            let level = (brick.subdivision_level.max(0) as usize).min(TRACKED_LEVELS - 1);
            self.bricks_per_level[level] += 1;
        }

        self.total_cells += 1;
        self.total_bricks += placement.subdivision.bricks.len() as u64;
        self.total_probes += placement.subdivision.probe_count as u64;
        self.total_scene_refs += placement
            .extraction
            .scene_refs
            .iter()
            .map(|(_, count)| count as u64 + 1)
            .sum::<u64>();
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            extraction: self.extraction_timings.stats(),
            subdivision: self.subdivision_timings.stats(),
            total_cells: self.total_cells,
            total_bricks: self.total_bricks,
            total_probes: self.total_probes,
            total_scene_refs: self.total_scene_refs,
        }
    }
}
