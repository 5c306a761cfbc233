//! Static in-memory R-Tree built bottom-up with STR packing.
//!
//! The tree is assembled in one pass from a batch of entries:
//! - entries are tiled into vertical slices and cut into leaves (`partition`)
//! - leaves and the internal levels above them are appended to a flat node
//!   pool, ids following creation order (`builder`, `node_pool`)
//! - range searches descend from the root, pruning with MBR intersection
//!   (`search`)
//!
//! Nodes never change after construction, so a built tree can be searched
//! from many threads at once.

mod builder;
pub mod node_pool;
pub mod partition;
pub mod persistence;
pub mod rtree_constants;
pub mod rtree_types;
pub mod search;
pub mod stats;
mod rtree_impl;

pub use node_pool::NodePool;
pub use partition::StrPlan;
pub use persistence::{
    load_snapshot, save_dump, save_snapshot, write_dump, IntegrityReport, SnapshotHeader,
};
pub use rtree_constants::{DEFAULT_BLOCK_SIZE, DEFAULT_ENTRY_SIZE};
pub use rtree_impl::StrRTree;
pub use rtree_types::{ChildRef, Entry, EntryId, Node, NodeId, SpatialError, SpatialResult};
pub use search::SearchResult;
pub use stats::{LevelStats, TreeStats};
