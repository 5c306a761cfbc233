//! Bulk load configuration.

use crate::rtree::rtree_constants::{DEFAULT_BLOCK_SIZE, DEFAULT_ENTRY_SIZE, MIN_NODE_CAPACITY};
use crate::rtree::rtree_types::{SpatialError, SpatialResult};

/// Configuration for building an [`StrRTree`](crate::StrRTree).
///
/// The node capacity is derived from a target node size in bytes divided by
/// an estimated per-entry size, unless set explicitly with
/// [`RTreeConfig::node_capacity`].
///
/// # Examples
///
/// ```rust
/// use str_rtree::RTreeConfig;
///
/// let config = RTreeConfig::new();
/// assert_eq!(config.capacity(), 28); // 1024 / 36
///
/// let config = RTreeConfig::new().block_size(4096);
/// assert_eq!(config.capacity(), 113);
///
/// let config = RTreeConfig::new().node_capacity(8);
/// assert_eq!(config.capacity(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RTreeConfig {
    /// Target node size in bytes
    pub block_size: usize,
    /// Estimated size of one entry in bytes
    pub entry_size: usize,
    /// Explicit capacity overriding the size-based derivation
    pub node_capacity: Option<usize>,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            entry_size: DEFAULT_ENTRY_SIZE,
            node_capacity: None,
        }
    }
}

impl RTreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target node size in bytes.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the estimated size of one entry in bytes.
    pub fn entry_size(mut self, entry_size: usize) -> Self {
        self.entry_size = entry_size;
        self
    }

    /// Fixes the node capacity, ignoring the byte sizes.
    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = Some(capacity);
        self
    }

    /// Maximum number of entries or children per node.
    pub fn capacity(&self) -> usize {
        match self.node_capacity {
            Some(capacity) => capacity,
            None if self.entry_size == 0 => 0,
            None => self.block_size / self.entry_size,
        }
    }

    /// Checks that the configuration yields a usable capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] if the entry size is zero
    /// or the capacity is below 2.
    pub fn validate(&self) -> SpatialResult<()> {
        if self.node_capacity.is_none() && self.entry_size == 0 {
            return Err(SpatialError::InvalidConfiguration(
                "entry size must be greater than zero".into(),
            ));
        }
        let capacity = self.capacity();
        if capacity < MIN_NODE_CAPACITY {
            return Err(SpatialError::InvalidConfiguration(format!(
                "node capacity must be at least {}, got {} (block size {}, entry size {})",
                MIN_NODE_CAPACITY, capacity, self.block_size, self.entry_size
            )));
        }
        Ok(())
    }
}
