//! Constants for the STR R-Tree.

/// Default node size in bytes used to derive the node capacity
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Estimated size of one entry in bytes (id + four coordinates)
pub const DEFAULT_ENTRY_SIZE: usize = 36;

/// Smallest capacity that still shrinks every level during construction
pub const MIN_NODE_CAPACITY: usize = 2;

/// Magic number for snapshot identification
pub const MAGIC: u32 = 0x53545254; // "STRT"

/// Snapshot format version
pub const VERSION: u32 = 1;
