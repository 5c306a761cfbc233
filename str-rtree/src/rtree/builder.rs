//! Bottom-up construction of the node pool.
//!
//! Leaves are cut from the STR slices first, then each level above is formed
//! by grouping the previous level's ids into consecutive chunks of at most
//! `capacity` children, in creation order, until a single root remains.

use std::ops::Range;

use super::node_pool::NodePool;
use super::rtree_types::{ChildRef, Entry, Node, NodeId};

/// The finished product of a bulk load
#[derive(Debug)]
pub(crate) struct BuiltTree {
    pub pool: NodePool,
    pub root: NodeId,
    pub height: u32,
    /// Pool id range of every level, leaves first
    pub level_bounds: Vec<Range<NodeId>>,
}

/// Threads the node pool and level bookkeeping through construction.
pub(crate) struct BulkLoader {
    pool: NodePool,
    capacity: usize,
    height: u32,
    level_bounds: Vec<Range<NodeId>>,
}

impl BulkLoader {
    pub fn new(capacity: usize, leaf_count: usize) -> Self {
        // a full tree holds roughly leaf_count * C / (C - 1) nodes
        let expected = leaf_count + leaf_count / (capacity - 1) + 1;
        Self {
            pool: NodePool::with_capacity(expected),
            capacity,
            height: 1,
            level_bounds: Vec::new(),
        }
    }

    /// Cuts every slice into leaves of at most `capacity` entries.
    ///
    /// Returns the leaf ids in creation order.
    pub fn build_leaves(&mut self, slices: Vec<Vec<Entry>>) -> Vec<NodeId> {
        let start = self.pool.next_id();
        let mut leaf_ids = Vec::new();

        for slice in slices {
            let mut rest = slice.into_iter().peekable();
            while rest.peek().is_some() {
                let entries: Vec<Entry> = rest.by_ref().take(self.capacity).collect();
                let id = self.pool.push(Node::leaf(self.pool.next_id(), entries));
                leaf_ids.push(id);
            }
        }

        self.level_bounds.push(start..self.pool.next_id());
        log::debug!("Created {} leaf nodes", leaf_ids.len());
        leaf_ids
    }

    /// Builds internal levels above `children` until one root is created.
    ///
    /// Every level is at least `capacity` times smaller than the one below,
    /// so this runs `O(log_C n)` rounds. A lone leaf still gets a root above it.
    pub fn build_upper_levels(&mut self, mut children: Vec<NodeId>) -> NodeId {
        loop {
            let parents = children.len().div_ceil(self.capacity);
            self.height += 1;

            if parents == 1 {
                let root = self.push_internal(&children);
                self.level_bounds.push(root..root + 1);
                log::debug!("Created root node {} at height {}", root, self.height);
                return root;
            }

            let start = self.pool.next_id();
            children = children
                .chunks(self.capacity)
                .map(|chunk| self.push_internal(chunk))
                .collect();
            self.level_bounds.push(start..self.pool.next_id());
            log::debug!(
                "Created {} internal nodes at level {}",
                children.len(),
                self.height
            );
        }
    }

    fn push_internal(&mut self, chunk: &[NodeId]) -> NodeId {
        let children: Vec<ChildRef> = chunk
            .iter()
            .map(|&node_id| ChildRef {
                node_id,
                mbr: *self.pool[node_id].mbr(),
            })
            .collect();
        let node = Node::internal(self.pool.next_id(), children, self.height);
        self.pool.push(node)
    }

    pub fn finish(self, root: NodeId) -> BuiltTree {
        BuiltTree {
            pool: self.pool,
            root,
            height: self.height,
            level_bounds: self.level_bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_entries(n: u64) -> Vec<Entry> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                Entry::from_coords(i, x, x + 1.0, 0.0, 1.0).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_build_leaves_chunks_each_slice() {
        let mut loader = BulkLoader::new(2, 3);
        let slices = vec![unit_entries(4), unit_entries(1)];
        let leaves = loader.build_leaves(slices);
        assert_eq!(leaves, vec![0, 1, 2]);

        let tree = loader.finish(2);
        assert_eq!(tree.pool[0].len(), 2);
        assert_eq!(tree.pool[1].len(), 2);
        assert_eq!(tree.pool[2].len(), 1);
        assert_eq!(tree.level_bounds, vec![0..3]);
    }

    #[test]
    fn test_single_leaf_gets_root() {
        let mut loader = BulkLoader::new(4, 1);
        let leaves = loader.build_leaves(vec![unit_entries(3)]);
        let root = loader.build_upper_levels(leaves);
        let tree = loader.finish(root);

        assert_eq!(root, 1);
        assert_eq!(tree.height, 2);
        assert_eq!(tree.pool.len(), 2);
        assert_eq!(tree.level_bounds, vec![0..1, 1..2]);
        match &tree.pool[root] {
            Node::Internal { children, level, .. } => {
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].node_id, 0);
                assert_eq!(*level, 2);
            }
            Node::Leaf { .. } => panic!("root must be internal"),
        }
    }

    #[test]
    fn test_upper_levels_use_consecutive_chunks() {
        // 5 leaves at capacity 2 -> 3 nodes -> 2 nodes -> root
        let mut loader = BulkLoader::new(2, 5);
        let leaves = loader.build_leaves(vec![unit_entries(10)]);
        assert_eq!(leaves.len(), 5);
        let root = loader.build_upper_levels(leaves);
        let tree = loader.finish(root);

        assert_eq!(tree.height, 4);
        assert_eq!(root, tree.pool.len() - 1);
        assert_eq!(tree.level_bounds, vec![0..5, 5..8, 8..10, 10..11]);

        // last chunk of the first internal level holds a single child
        let counts: Vec<usize> = tree.pool.slice(5..8).iter().map(Node::len).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        if let Node::Internal { children, .. } = &tree.pool[7] {
            assert_eq!(children[0].node_id, 4);
        }
    }
}
