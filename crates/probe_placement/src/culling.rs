//! Culling of influence volumes against indicator volumes.

use crate::obb::obb_intersect;
use crate::volume::Volume;

/// Cullees overlapping at least one culler, in order of selection.
///
/// Cullers are visited in order, and each tests every cullee not yet
/// selected. A cullee equal by value to one already selected is skipped as
/// well, so the result never holds two identical volumes.
pub fn cull_volumes(cullees: &[Volume], cullers: &[Volume]) -> Vec<Volume> {
  let mut selected = vec![false; cullees.len()];
  let mut result: Vec<Volume> = Vec::new();

  for culler in cullers {
    for (i, cullee) in cullees.iter().enumerate() {
      if selected[i] {
        continue;
      }
      if result.contains(cullee) {
        selected[i] = true;
        continue;
      }
      if obb_intersect(culler, cullee) {
        selected[i] = true;
        result.push(*cullee);
      }
    }
  }

  result
}

#[cfg(test)]
#[path = "culling_test.rs"]
mod culling_test;
