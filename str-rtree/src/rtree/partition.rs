//! Sort-Tile-Recursive partitioning of the input entries.
//!
//! Entries are sorted by `x_low`, cut into `S = ceil(sqrt(ceil(n / C)))`
//! vertical slices of at most `S * C` entries, and each slice is sorted by
//! `y_low`. Consecutive runs of `C` entries in the resulting order form the
//! leaves. Both sorts are stable, so equal keys keep their input order.

use std::cmp::Ordering;

use super::rtree_constants::MIN_NODE_CAPACITY;
use super::rtree_types::{Entry, SpatialError, SpatialResult};

/// Sizes derived for one STR bulk load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrPlan {
    /// Number of input entries
    pub entry_count: usize,
    /// Maximum entries per node
    pub capacity: usize,
    /// Number of leaves the load will produce, `ceil(n / C)`
    pub leaf_count: usize,
    /// Number of vertical slices, `ceil(sqrt(leaf_count))`
    pub slice_count: usize,
}

impl StrPlan {
    /// Computes the plan for `entry_count` entries at node capacity `capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] if `capacity < 2` and
    /// [`SpatialError::EmptyDataset`] if `entry_count == 0`.
    pub fn new(entry_count: usize, capacity: usize) -> SpatialResult<Self> {
        if capacity < MIN_NODE_CAPACITY {
            return Err(SpatialError::InvalidConfiguration(format!(
                "node capacity must be at least {}, got {}",
                MIN_NODE_CAPACITY, capacity
            )));
        }
        if entry_count == 0 {
            return Err(SpatialError::EmptyDataset);
        }

        let leaf_count = entry_count.div_ceil(capacity);
        let slice_count = ceil_sqrt(leaf_count);
        Ok(Self {
            entry_count,
            capacity,
            leaf_count,
            slice_count,
        })
    }

    /// Maximum number of entries in one vertical slice
    pub fn slice_len(&self) -> usize {
        self.slice_count * self.capacity
    }
}

/// Smallest `s` with `s * s >= n`.
fn ceil_sqrt(n: usize) -> usize {
    let mut s = (n as f64).sqrt() as usize;
    // correct float rounding in either direction
    while s * s < n {
        s += 1;
    }
    while s > 0 && (s - 1) * (s - 1) >= n {
        s -= 1;
    }
    s
}

/// Numeric ordering of sort keys; `-0.0` and `0.0` compare equal.
/// Coordinates are never NaN once a `Rect` has been validated.
fn by_key(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Reorders `entries` into STR tiling order and returns the slices.
///
/// Each returned slice is already sorted by `y_low`; concatenating them
/// gives the sequence the leaf builder consumes.
pub fn str_partition(mut entries: Vec<Entry>, plan: &StrPlan) -> Vec<Vec<Entry>> {
    entries.sort_by(|a, b| by_key(a.rect.x_low, b.rect.x_low));

    let slice_len = plan.slice_len();
    let mut slices = Vec::with_capacity(plan.slice_count);
    let mut rest = entries.into_iter().peekable();
    while rest.peek().is_some() {
        let mut slice: Vec<Entry> = rest.by_ref().take(slice_len).collect();
        slice.sort_by(|a, b| by_key(a.rect.y_low, b.rect.y_low));
        slices.push(slice);
    }
    slices
}
