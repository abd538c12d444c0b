//! Brick layout constants.
//!
//! A brick is a cube of `BRICK_CELL_COUNT³` cells sampled by
//! `BRICK_PROBE_COUNT_PER_DIM³` probes. Subdividing a brick splits it into
//! `BRICK_CELL_COUNT³` children one level finer.
//!
//! ```text
//!  probes:   0     1     2     3
//!            ●─────●─────●─────●
//!            │cell0│cell1│cell2│
//!            └─────┴─────┴─────┘
//!            0    1/3   2/3    1   (fraction of brick size)
//! ```
//!
//! # Brick Size
//!
//! ```text
//! Brick Size (reference units) = BRICK_CELL_COUNT ^ level = 3^level
//! Brick Size (world units)     = 3^level * min_brick_size
//! ```

/// Cells per brick edge. Also the split factor per subdivision step.
pub const BRICK_CELL_COUNT: i32 = 3;

/// Probes per brick edge (cells + 1).
pub const BRICK_PROBE_COUNT_PER_DIM: usize = 4;

/// Probes per brick (4³ = 64).
pub const BRICK_PROBE_COUNT_TOTAL: usize =
  BRICK_PROBE_COUNT_PER_DIM * BRICK_PROBE_COUNT_PER_DIM * BRICK_PROBE_COUNT_PER_DIM;

/// Children produced by one subdivision step (3³ = 27).
pub const BRICK_CHILD_COUNT: usize =
  (BRICK_CELL_COUNT * BRICK_CELL_COUNT * BRICK_CELL_COUNT) as usize;

/// Deepest supported subdivision. `3^15` still fits comfortably in an `i32`.
///
/// Brick corners are `i32` reference units, so a lattice covers at most
/// `±i32::MAX` minimum-brick sizes around its origin.
pub const MAX_SUBDIVISION_LEVELS: i32 = 15;

/// Brick edge length in reference-space units at the given level.
///
/// Levels are clamped to `0..=MAX_SUBDIVISION_LEVELS`.
#[inline]
pub fn cell_size(subdivision_level: i32) -> i32 {
  BRICK_CELL_COUNT.pow(subdivision_level.clamp(0, MAX_SUBDIVISION_LEVELS) as u32)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
