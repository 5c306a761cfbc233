//! Core types and data structures for the STR R-Tree.
//!
//! This module defines the fundamental types used throughout the tree:
//! - Error types and result types
//! - Entries stored at the leaf level
//! - Node types (Leaf and Internal)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

use crate::rect::Rect;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading, building or persisting a tree
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Cannot build an R-Tree from an empty dataset")]
    EmptyDataset,

    #[error("Invalid rectangle ({x_low}, {x_high}, {y_low}, {y_high}): low bound exceeds high bound")]
    InvalidRectangle {
        x_low: f64,
        x_high: f64,
        y_low: f64,
        y_high: f64,
    },

    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Unknown predicate '{0}', expected intersects, inside or contains")]
    UnknownPredicate(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Identifier carried by an input record
pub type EntryId = u64;

/// Node identifier - the node's position in the node pool
pub type NodeId = usize;

// ============================================================================
// Entries
// ============================================================================

/// A rectangle stored at the leaf level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub rect: Rect,
}

impl Entry {
    /// Wraps `rect`, rejecting it if its bounds are inverted or NaN.
    pub fn new(id: EntryId, rect: Rect) -> SpatialResult<Self> {
        Ok(Self {
            id,
            rect: rect.validated()?,
        })
    }

    /// Builds an entry from raw coordinates, validating the rectangle.
    pub fn from_coords(
        id: EntryId,
        x_low: f64,
        x_high: f64,
        y_low: f64,
        y_high: f64,
    ) -> SpatialResult<Self> {
        Self::new(id, Rect::new(x_low, x_high, y_low, y_high)?)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.id, self.rect)
    }
}

// ============================================================================
// Node Types
// ============================================================================

/// A child reference in an internal node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChildRef {
    pub node_id: NodeId,
    pub mbr: Rect,
}

impl fmt::Display for ChildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.node_id, self.mbr)
    }
}

/// Node types in the R-Tree.
///
/// The MBR of a node is folded once over its immediate children (or entries)
/// when the node is created and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Leaf node owning the actual entries
    Leaf {
        id: NodeId,
        entries: Vec<Entry>,
        mbr: Rect,
    },
    /// Internal node referencing children by pool id
    Internal {
        id: NodeId,
        children: Vec<ChildRef>,
        mbr: Rect,
        level: u32, // Height from leaf level (leaves are 1)
    },
}

impl Node {
    pub fn leaf(id: NodeId, entries: Vec<Entry>) -> Self {
        let mbr = compute_entries_mbr(&entries);
        Node::Leaf { id, entries, mbr }
    }

    pub fn internal(id: NodeId, children: Vec<ChildRef>, level: u32) -> Self {
        let mbr = compute_children_mbr(&children);
        Node::Internal {
            id,
            children,
            mbr,
            level,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Leaf { id, .. } | Node::Internal { id, .. } => *id,
        }
    }

    /// The cached minimum bounding rectangle
    pub fn mbr(&self) -> &Rect {
        match self {
            Node::Leaf { mbr, .. } | Node::Internal { mbr, .. } => mbr,
        }
    }

    /// Recomputes the MBR from the immediate children/entries
    pub fn compute_mbr(&self) -> Rect {
        match self {
            Node::Leaf { entries, .. } => compute_entries_mbr(entries),
            Node::Internal { children, .. } => compute_children_mbr(children),
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { level, .. } => *level,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn len(&self) -> usize {
        match self {
            Node::Leaf { entries, .. } => entries.len(),
            Node::Internal { children, .. } => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Renders `id, count, [(child, (x_low, x_high, y_low, y_high)), ...]`
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, [", self.id(), self.len())?;
        match self {
            Node::Leaf { entries, .. } => write_list(f, entries)?,
            Node::Internal { children, .. } => write_list(f, children)?,
        }
        write!(f, "]")
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn compute_entries_mbr(entries: &[Entry]) -> Rect {
    let mut mbr = Rect::empty();
    for e in entries {
        mbr.expand(&e.rect);
    }
    mbr
}

fn compute_children_mbr(children: &[ChildRef]) -> Rect {
    let mut mbr = Rect::empty();
    for c in children {
        mbr.expand(&c.mbr);
    }
    mbr
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: EntryId, x_low: f64, x_high: f64, y_low: f64, y_high: f64) -> Entry {
        Entry::from_coords(id, x_low, x_high, y_low, y_high).unwrap()
    }

    #[test]
    fn test_leaf_mbr_is_tight() {
        let node = Node::leaf(
            0,
            vec![entry(1, 0.0, 1.0, 0.0, 1.0), entry(2, 2.0, 3.0, -1.0, 0.5)],
        );
        assert_eq!(node.mbr(), &Rect::new(0.0, 3.0, -1.0, 1.0).unwrap());
        assert_eq!(node.compute_mbr(), *node.mbr());
        assert!(node.is_leaf());
        assert_eq!(node.level(), 1);
        assert_eq!(node.len(), 2);
    }

    #[test]
    fn test_internal_mbr_folds_children() {
        let children = vec![
            ChildRef {
                node_id: 0,
                mbr: Rect::new(0.0, 1.0, 0.0, 1.0).unwrap(),
            },
            ChildRef {
                node_id: 1,
                mbr: Rect::new(5.0, 6.0, 2.0, 9.0).unwrap(),
            },
        ];
        let node = Node::internal(2, children, 2);
        assert_eq!(node.id(), 2);
        assert_eq!(node.level(), 2);
        assert!(!node.is_leaf());
        assert_eq!(node.mbr(), &Rect::new(0.0, 6.0, 0.0, 9.0).unwrap());
    }

    #[test]
    fn test_entry_from_coords_validates() {
        assert!(Entry::from_coords(7, 1.0, 0.0, 0.0, 1.0).is_err());
        let e = entry(7, 0.0, 1.0, 0.0, 1.0);
        assert_eq!(e.id, 7);
    }

    #[test]
    fn test_entry_new_rejects_unchecked_rect() {
        let inverted = Rect {
            x_low: 5.0,
            x_high: 1.0,
            y_low: 0.0,
            y_high: 1.0,
        };
        assert!(matches!(
            Entry::new(1, inverted),
            Err(SpatialError::InvalidRectangle { .. })
        ));
        let nan = Rect {
            y_high: f64::NAN,
            ..Rect::default()
        };
        assert!(Entry::new(2, nan).is_err());
        assert!(Entry::new(3, Rect::default()).is_ok());
    }

    #[test]
    fn test_node_display() {
        let leaf = Node::leaf(3, vec![entry(10, 0.0, 1.0, 0.0, 1.0), entry(11, 2.0, 3.0, 0.0, 1.0)]);
        assert_eq!(
            leaf.to_string(),
            "3, 2, [(10, (0.0, 1.0, 0.0, 1.0)), (11, (2.0, 3.0, 0.0, 1.0))]"
        );

        let root = Node::internal(
            4,
            vec![ChildRef {
                node_id: 3,
                mbr: *leaf.mbr(),
            }],
            2,
        );
        assert_eq!(root.to_string(), "4, 1, [(3, (0.0, 3.0, 0.0, 1.0))]");
    }

    #[test]
    fn test_error_messages() {
        let err = SpatialError::Parse {
            line: 3,
            reason: "expected 5 fields, found 4".into(),
        };
        assert_eq!(err.to_string(), "Parse error on line 3: expected 5 fields, found 4");
        assert_eq!(
            SpatialError::EmptyDataset.to_string(),
            "Cannot build an R-Tree from an empty dataset"
        );
    }
}
