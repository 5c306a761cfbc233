//! Append-only arena owning every node of a tree.

use std::ops::{Index, Range};

use serde::{Deserialize, Serialize};

use super::rtree_types::{Node, NodeId};

/// Flat, append-only storage for tree nodes.
///
/// A node's id is its position in the pool: ids are handed out in creation
/// order starting at 0, all leaves first and then each level above them.
/// Internal nodes refer to their children by id, so the pool can be written
/// out as a flat array and shared read-only between threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePool {
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// The id the next appended node must carry
    #[inline]
    pub fn next_id(&self) -> NodeId {
        self.nodes.len()
    }

    /// Appends a node and returns its id.
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = self.next_id();
        debug_assert_eq!(node.id(), id, "node id must match its pool position");
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes with ids in `range`, in creation order
    pub fn slice(&self, range: Range<NodeId>) -> &[Node] {
        &self.nodes[range]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    #[cfg(test)]
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl Index<NodeId> for NodePool {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl<'a> IntoIterator for &'a NodePool {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
