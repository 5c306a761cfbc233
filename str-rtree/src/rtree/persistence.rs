//! Persistence and reliability features for the STR R-Tree.
//!
//! This module provides:
//! - Integrity reports produced by [`StrRTree::check_integrity`]
//! - A human-readable text dump, root level first
//! - A binary snapshot of the node pool that can be loaded back

use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::node_pool::NodePool;
use super::rtree_constants::{MAGIC, VERSION};
use super::rtree_impl::StrRTree;
use super::rtree_types::{NodeId, SpatialError, SpatialResult};

// ============================================================================
// Integrity Checking
// ============================================================================

/// Result of an integrity check
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Total nodes checked
    pub nodes_checked: u64,
    /// Total leaf entries checked
    pub entries_checked: u64,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            entries_checked: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Text Dump
// ============================================================================

/// Writes the tree as text: the root id, the height, then one line per node
/// from the root level down to the leaves.
pub fn write_dump<W: Write>(tree: &StrRTree, mut writer: W) -> SpatialResult<()> {
    writeln!(writer, "{}", tree.root())?;
    writeln!(writer, "{}", tree.height())?;
    for node in tree.pool().iter().rev() {
        writeln!(writer, "{}", node)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the text dump to `path`, replacing any existing file.
pub fn save_dump(tree: &StrRTree, path: impl AsRef<Path>) -> SpatialResult<()> {
    let file = File::create(path.as_ref())?;
    write_dump(tree, BufWriter::new(file))?;
    log::debug!("Wrote tree dump to {:?}", path.as_ref());
    Ok(())
}

// ============================================================================
// Binary Snapshot
// ============================================================================

/// Header identifying a snapshot file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
}

impl SnapshotHeader {
    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
        }
    }

    pub fn validate(&self) -> SpatialResult<()> {
        if self.magic != MAGIC {
            return Err(SpatialError::CorruptSnapshot(
                "Invalid file format (bad magic)".into(),
            ));
        }
        if self.version != VERSION {
            return Err(SpatialError::CorruptSnapshot(format!(
                "Unsupported snapshot version {}",
                self.version
            )));
        }
        Ok(())
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk form of a tree. Node ids are pool positions, so the pool is
/// stored as a flat array.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    header: SnapshotHeader,
    root: NodeId,
    height: u32,
    capacity: usize,
    level_bounds: Vec<Range<NodeId>>,
    nodes: NodePool,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    header: SnapshotHeader,
    root: NodeId,
    height: u32,
    capacity: usize,
    level_bounds: &'a [Range<NodeId>],
    nodes: &'a NodePool,
}

/// Encodes the tree into snapshot bytes.
pub fn encode_snapshot(tree: &StrRTree) -> SpatialResult<Vec<u8>> {
    let snapshot = SnapshotRef {
        header: SnapshotHeader::new(),
        root: tree.root(),
        height: tree.height(),
        capacity: tree.capacity(),
        level_bounds: tree.level_bounds(),
        nodes: tree.pool(),
    };
    bincode::serde::encode_to_vec(&snapshot, bincode::config::legacy())
        .map_err(|e| SpatialError::Serialization(e.to_string()))
}

/// Decodes snapshot bytes and verifies the resulting tree.
///
/// # Errors
///
/// Returns [`SpatialError::Serialization`] if the bytes cannot be decoded and
/// [`SpatialError::CorruptSnapshot`] if the header or the tree structure is
/// invalid.
pub fn decode_snapshot(bytes: &[u8]) -> SpatialResult<StrRTree> {
    let (snapshot, _): (Snapshot, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::legacy())
            .map_err(|e| SpatialError::Serialization(e.to_string()))?;
    snapshot.header.validate()?;

    let tree = StrRTree::from_parts(
        snapshot.nodes,
        snapshot.root,
        snapshot.height,
        snapshot.capacity,
        snapshot.level_bounds,
    );
    let report = tree.check_integrity();
    if !report.is_valid {
        return Err(SpatialError::CorruptSnapshot(report.errors.join("; ")));
    }
    Ok(tree)
}

/// Writes a binary snapshot of the tree to `path`.
pub fn save_snapshot(tree: &StrRTree, path: impl AsRef<Path>) -> SpatialResult<()> {
    let bytes = encode_snapshot(tree)?;
    std::fs::write(path.as_ref(), &bytes)?;
    log::debug!(
        "Wrote snapshot of {} nodes ({} bytes) to {:?}",
        tree.node_count(),
        bytes.len(),
        path.as_ref()
    );
    Ok(())
}

/// Loads a tree previously written with [`save_snapshot`].
pub fn load_snapshot(path: impl AsRef<Path>) -> SpatialResult<StrRTree> {
    let bytes = std::fs::read(path.as_ref())?;
    let tree = decode_snapshot(&bytes)?;
    log::debug!(
        "Loaded snapshot of {} nodes from {:?}",
        tree.node_count(),
        path.as_ref()
    );
    Ok(tree)
}
