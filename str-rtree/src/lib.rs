//! # STR R-Tree - Static Spatial Index for Rectangles
//!
//! This crate builds a static, memory-resident R-Tree over a batch of
//! axis-aligned rectangles using Sort-Tile-Recursive (STR) bulk loading, and
//! answers range queries against it with one of three predicates.
//!
//! ## Features
//!
//! - **STR Bulk Load**: entries are tiled into slices and packed into full leaves
//! - **Flat Node Pool**: nodes live in one arena and refer to children by id
//! - **Three Predicates**: `intersects`, `inside` and `contains`
//! - **Visit Counting**: every search reports how many nodes it touched
//! - **Thread Safe Reads**: a built tree is immutable and can be shared freely
//! - **Persistence**: text dumps and binary snapshots of the node pool
//!
//! ## Quick Start
//!
//! ```rust
//! use str_rtree::{Entry, Predicate, Rect, StrRTree};
//!
//! # fn main() -> Result<(), str_rtree::SpatialError> {
//! let entries = vec![
//!     Entry::from_coords(1, 0.0, 1.0, 0.0, 1.0)?,
//!     Entry::from_coords(2, 2.0, 3.0, 0.0, 1.0)?,
//!     Entry::from_coords(3, 0.0, 1.0, 2.0, 3.0)?,
//!     Entry::from_coords(4, 2.0, 3.0, 2.0, 3.0)?,
//! ];
//!
//! // Bulk load with at most two entries per node
//! let tree = StrRTree::build(entries, 2)?;
//! assert_eq!(tree.height(), 2);
//!
//! // Entries strictly inside the query rectangle
//! let query = Rect::new(-1.0, 4.0, -1.0, 4.0)?;
//! let result = tree.range_search(&query, Predicate::Inside);
//! assert_eq!(result.len(), 4);
//! assert_eq!(result.visited, 3);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod predicate;
pub mod records;
pub mod rect;
pub mod rtree;

pub use config::RTreeConfig;
pub use predicate::Predicate;
pub use records::{parse_entries, parse_queries, QueryRecord};
pub use rect::Rect;
pub use rtree::{
    Entry, EntryId, IntegrityReport, Node, NodeId, SearchResult, SpatialError, SpatialResult,
    StrPlan, StrRTree, TreeStats,
};

/// Bulk loads `entries` with node capacity `capacity`.
///
/// Shorthand for [`StrRTree::build`].
pub fn build<I>(entries: I, capacity: usize) -> SpatialResult<StrRTree>
where
    I: IntoIterator<Item = Entry>,
{
    StrRTree::build(entries, capacity)
}

/// Runs a range search on `tree`.
///
/// Shorthand for [`StrRTree::range_search`].
pub fn range_search(tree: &StrRTree, query: &Rect, predicate: Predicate) -> SearchResult {
    tree.range_search(query, predicate)
}
