//! StrRTree implementation.

use std::collections::HashSet;
use std::ops::Range;

use crate::config::RTreeConfig;
use crate::predicate::Predicate;
use crate::rect::Rect;

use super::builder::BulkLoader;
use super::node_pool::NodePool;
use super::partition::{str_partition, StrPlan};
use super::persistence::IntegrityReport;
use super::rtree_types::{Entry, Node, NodeId, SpatialResult};
use super::search::{self, SearchResult};

/// A static, memory-resident R-Tree bulk loaded with STR packing.
///
/// The tree is immutable once built: there is no insert or delete. All nodes
/// live in a [`NodePool`] and are addressed by id, so a tree can be shared
/// between threads (for example behind an `Arc`) and searched concurrently
/// without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct StrRTree {
    pool: NodePool,
    root: NodeId,
    height: u32,
    capacity: usize,
    entry_count: usize,
    /// Pool id range of every level, leaves first
    level_bounds: Vec<Range<NodeId>>,
}

impl StrRTree {
    /// Bulk loads `entries` into a new tree using STR (Sort-Tile-Recursive) packing.
    ///
    /// # Algorithm
    /// 1. Sort entries by `x_low` and cut them into `ceil(sqrt(ceil(n / C)))` vertical slices
    /// 2. Sort every slice by `y_low`
    /// 3. Cut each slice into leaves of at most `C` entries
    /// 4. Group consecutive node ids into parents until one root remains
    ///
    /// The result is deterministic: loading the same sequence twice yields
    /// structurally identical trees.
    ///
    /// # Errors
    /// - [`SpatialError::InvalidConfiguration`] if `capacity <= 1`
    /// - [`SpatialError::EmptyDataset`] if `entries` is empty
    /// - [`SpatialError::InvalidRectangle`] if any entry has inverted or NaN bounds
    ///
    /// # Example
    /// ```
    /// use str_rtree::{Entry, Predicate, Rect, StrRTree};
    ///
    /// let entries = vec![
    ///     Entry::from_coords(1, 0.0, 1.0, 0.0, 1.0).unwrap(),
    ///     Entry::from_coords(2, 2.0, 3.0, 2.0, 3.0).unwrap(),
    /// ];
    /// let tree = StrRTree::build(entries, 2).unwrap();
    ///
    /// let query = Rect::new(-1.0, 1.5, -1.0, 1.5).unwrap();
    /// let result = tree.range_search(&query, Predicate::Inside);
    /// assert_eq!(result.hits, vec![1]);
    /// ```
    ///
    /// [`SpatialError::InvalidConfiguration`]: super::SpatialError::InvalidConfiguration
    /// [`SpatialError::EmptyDataset`]: super::SpatialError::EmptyDataset
    /// [`SpatialError::InvalidRectangle`]: super::SpatialError::InvalidRectangle
    pub fn build<I>(entries: I, capacity: usize) -> SpatialResult<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        let entries: Vec<Entry> = entries.into_iter().collect();
        let plan = StrPlan::new(entries.len(), capacity)?;
        // entries built as struct literals skip Entry::new
        for entry in &entries {
            entry.rect.validated()?;
        }
        log::debug!(
            "STR bulk load: {} entries, capacity {}, {} leaves, {} slices",
            plan.entry_count,
            plan.capacity,
            plan.leaf_count,
            plan.slice_count
        );

        let slices = str_partition(entries, &plan);
        let mut loader = BulkLoader::new(capacity, plan.leaf_count);
        let leaves = loader.build_leaves(slices);
        let root = loader.build_upper_levels(leaves);
        let built = loader.finish(root);

        log::debug!(
            "STR bulk load finished: {} nodes, height {}",
            built.pool.len(),
            built.height
        );

        Ok(Self {
            pool: built.pool,
            root: built.root,
            height: built.height,
            capacity,
            entry_count: plan.entry_count,
            level_bounds: built.level_bounds,
        })
    }

    /// Validates `config` and bulk loads with its derived capacity.
    pub fn build_with_config<I>(entries: I, config: &RTreeConfig) -> SpatialResult<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        config.validate()?;
        Self::build(entries, config.capacity())
    }

    /// Assembles a tree from already-built parts. Callers must run
    /// [`StrRTree::check_integrity`] before trusting the result.
    pub(crate) fn from_parts(
        pool: NodePool,
        root: NodeId,
        height: u32,
        capacity: usize,
        level_bounds: Vec<Range<NodeId>>,
    ) -> Self {
        let entry_count = pool
            .iter()
            .filter(|node| node.is_leaf())
            .map(Node::len)
            .sum();
        Self {
            pool,
            root,
            height,
            capacity,
            entry_count,
            level_bounds,
        }
    }

    /// Finds the entries of this tree matching `predicate` against `query`.
    ///
    /// Returns the matching entry ids and the number of nodes visited. The
    /// root is always visited, so `visited >= 1`.
    pub fn range_search(&self, query: &Rect, predicate: Predicate) -> SearchResult {
        search::range_search(&self.pool, self.root, query, predicate)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.pool[self.root]
    }

    /// Number of levels, leaf level included
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries stored in the tree
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.level_bounds.first().map_or(0, |r| r.len())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.pool.get(id)
    }

    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    pub fn level_bounds(&self) -> &[Range<NodeId>] {
        &self.level_bounds
    }

    /// Nodes grouped per level, leaves first
    pub fn levels(&self) -> impl Iterator<Item = &[Node]> + '_ {
        self.level_bounds
            .iter()
            .map(move |range| self.pool.slice(range.clone()))
    }

    /// Every entry reachable from the root, in leaf order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.pool.iter().flat_map(|node| match node {
            Node::Leaf { entries, .. } => entries.as_slice(),
            Node::Internal { .. } => &[][..],
        })
    }

    /// Verifies the structural invariants of the tree.
    ///
    /// Checks that:
    /// - every node id equals its pool position and the root is the last node
    /// - children are referenced by smaller ids, each exactly once
    /// - no node holds more than `capacity` children or entries
    /// - every cached MBR equals the fold over the node's immediate contents
    /// - every child reference carries its child's MBR
    /// - level bounds cover the pool contiguously, leaves first
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();

        if self.pool.is_empty() {
            report.fail("Node pool is empty".to_string());
            return report;
        }
        if self.root != self.pool.len() - 1 {
            report.fail(format!(
                "Root {} is not the last node (pool holds {})",
                self.root,
                self.pool.len()
            ));
        }
        if self.capacity < 2 {
            report.fail(format!("Capacity {} is below 2", self.capacity));
        }
        self.check_level_bounds(&mut report);

        let mut referenced = HashSet::new();
        for (position, node) in self.pool.iter().enumerate() {
            report.nodes_checked += 1;

            if node.id() != position {
                report.fail(format!("Node at position {} carries id {}", position, node.id()));
            }
            if node.is_empty() {
                report.fail(format!("Node {} is empty", position));
            }
            if node.len() > self.capacity {
                report.fail(format!(
                    "Node {} holds {} items, capacity is {}",
                    position,
                    node.len(),
                    self.capacity
                ));
            }
            if node.compute_mbr() != *node.mbr() {
                report.fail(format!("Node {} has a stale MBR", position));
            }

            match node {
                Node::Leaf { entries, .. } => {
                    report.entries_checked += entries.len() as u64;
                    for entry in entries {
                        if !entry.rect.is_valid() {
                            report.fail(format!("Entry {} has an invalid rectangle", entry.id));
                        }
                    }
                }
                Node::Internal { children, .. } => {
                    for child in children {
                        if child.node_id >= position {
                            report.fail(format!(
                                "Node {} references child {} which is not older",
                                position, child.node_id
                            ));
                            continue;
                        }
                        if !referenced.insert(child.node_id) {
                            report.fail(format!("Node {} is referenced twice", child.node_id));
                        }
                        if self.pool[child.node_id].mbr() != &child.mbr {
                            report.fail(format!(
                                "Node {} caches a wrong MBR for child {}",
                                position, child.node_id
                            ));
                        }
                    }
                }
            }
        }

        for id in 0..self.pool.len() {
            if id != self.root && !referenced.contains(&id) {
                report.fail(format!("Node {} is unreachable from the root", id));
            }
        }

        report
    }

    fn check_level_bounds(&self, report: &mut IntegrityReport) {
        if self.level_bounds.len() != self.height as usize {
            report.fail(format!(
                "Height {} does not match {} recorded levels",
                self.height,
                self.level_bounds.len()
            ));
        }
        let mut expected_start = 0;
        for (i, range) in self.level_bounds.iter().enumerate() {
            if range.start != expected_start || range.is_empty() || range.end > self.pool.len() {
                report.fail(format!("Level {} has malformed bounds {:?}", i + 1, range));
                return;
            }
            let level = i as u32 + 1;
            if let Some(node) = self.pool.slice(range.clone()).iter().find(|n| n.level() != level) {
                report.fail(format!("Node {} is recorded at the wrong level", node.id()));
            }
            expected_start = range.end;
        }
        if expected_start != self.pool.len() {
            report.fail("Level bounds do not cover the node pool".to_string());
        }
    }
}
