//! Recursive range search over the node pool.

use crate::predicate::Predicate;
use crate::rect::{intersects, Rect};

use super::node_pool::NodePool;
use super::rtree_types::{EntryId, Node, NodeId};

/// Outcome of one range search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Ids of matching entries, in traversal order
    pub hits: Vec<EntryId>,
    /// Number of nodes dereferenced, the root included
    pub visited: usize,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

pub(crate) fn range_search(
    pool: &NodePool,
    root: NodeId,
    query: &Rect,
    predicate: Predicate,
) -> SearchResult {
    let mut hits = Vec::new();
    let visited = search_recursive(pool, root, query, predicate, &mut hits);
    log::trace!(
        "{} search visited {} nodes, {} hits",
        predicate,
        visited,
        hits.len()
    );
    SearchResult { hits, visited }
}

/// Visits `node_id` and every descendant whose MBR intersects the query.
///
/// Subtrees are pruned with `intersects` whatever the predicate: a child MBR
/// that only overlaps the query can still hold entries that are inside it or
/// that contain it. The predicate itself is only applied to leaf entries.
fn search_recursive(
    pool: &NodePool,
    node_id: NodeId,
    query: &Rect,
    predicate: Predicate,
    hits: &mut Vec<EntryId>,
) -> usize {
    let mut visited = 1;

    match &pool[node_id] {
        Node::Leaf { entries, .. } => {
            for entry in entries {
                if predicate.evaluate(query, &entry.rect) {
                    hits.push(entry.id);
                }
            }
        }
        Node::Internal { children, .. } => {
            for child in children {
                if intersects(query, &child.mbr) {
                    visited += search_recursive(pool, child.node_id, query, predicate, hits);
                }
            }
        }
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtree::rtree_types::{ChildRef, Entry};

    /// Two leaves of two unit squares each under one root.
    fn two_leaf_pool() -> NodePool {
        let e = |id, x: f64, y: f64| Entry::from_coords(id, x, x + 1.0, y, y + 1.0).unwrap();
        let mut pool = NodePool::new();
        let left = pool.push(Node::leaf(0, vec![e(1, 0.0, 0.0), e(3, 0.0, 2.0)]));
        let right = pool.push(Node::leaf(1, vec![e(2, 2.0, 0.0), e(4, 2.0, 2.0)]));
        let children = [left, right]
            .iter()
            .map(|&node_id| ChildRef {
                node_id,
                mbr: *pool[node_id].mbr(),
            })
            .collect();
        pool.push(Node::internal(2, children, 2));
        pool
    }

    #[test]
    fn test_search_prunes_disjoint_children() {
        let pool = two_leaf_pool();
        let query = Rect::new(-0.5, 0.5, -0.5, 0.5).unwrap();
        let result = range_search(&pool, 2, &query, Predicate::Intersects);
        assert_eq!(result.hits, vec![1]);
        assert_eq!(result.visited, 2);
    }

    #[test]
    fn test_search_disjoint_visits_root_only() {
        let pool = two_leaf_pool();
        let query = Rect::new(10.0, 11.0, 10.0, 11.0).unwrap();
        let result = range_search(&pool, 2, &query, Predicate::Intersects);
        assert!(result.is_empty());
        assert_eq!(result.visited, 1);
    }

    #[test]
    fn test_predicate_applies_to_entries_not_leaf_mbr() {
        let pool = two_leaf_pool();
        // strictly inside the left leaf's MBR but inside no entry
        let query = Rect::new(0.2, 0.4, 1.2, 1.4).unwrap();
        let result = range_search(&pool, 2, &query, Predicate::Contains);
        assert!(result.is_empty());
        assert_eq!(result.visited, 2);

        let query = Rect::new(0.2, 0.4, 0.2, 0.4).unwrap();
        let result = range_search(&pool, 2, &query, Predicate::Contains);
        assert_eq!(result.hits, vec![1]);
    }

    #[test]
    fn test_inside_descends_through_partial_overlap() {
        let pool = two_leaf_pool();
        // overlaps both leaf MBRs partially, fully covers entries 1 and 2
        let query = Rect::new(-1.0, 3.5, -1.0, 1.5).unwrap();
        let result = range_search(&pool, 2, &query, Predicate::Inside);
        assert_eq!(result.hits, vec![1, 2]);
        assert_eq!(result.visited, 3);
    }
}
