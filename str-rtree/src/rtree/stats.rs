//! Per-level statistics of a built tree.

use std::fmt;

use super::rtree_impl::StrRTree;
use super::rtree_types::Node;

/// Statistics about one tree level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStats {
    /// Level number, leaves are 1
    pub level: u32,
    pub node_count: usize,
    /// Mean area of the node MBRs
    pub average_area: f64,
    /// Mean of each MBR coordinate, `(x_low, x_high, y_low, y_high)`
    pub average_mbr: (f64, f64, f64, f64),
}

/// Statistics about a whole tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub height: u32,
    pub node_count: usize,
    pub entry_count: usize,
    pub levels: Vec<LevelStats>,
}

impl TreeStats {
    pub fn collect(tree: &StrRTree) -> Self {
        let levels = tree
            .levels()
            .enumerate()
            .map(|(i, nodes)| level_stats(i as u32 + 1, nodes))
            .collect();

        Self {
            height: tree.height(),
            node_count: tree.node_count(),
            entry_count: tree.len(),
            levels,
        }
    }
}

fn level_stats(level: u32, nodes: &[Node]) -> LevelStats {
    let count = nodes.len().max(1) as f64;
    let mut area = 0.0;
    let mut sums = (0.0, 0.0, 0.0, 0.0);
    for node in nodes {
        let mbr = node.mbr();
        area += mbr.area();
        sums.0 += mbr.x_low;
        sums.1 += mbr.x_high;
        sums.2 += mbr.y_low;
        sums.3 += mbr.y_high;
    }

    LevelStats {
        level,
        node_count: nodes.len(),
        average_area: area / count,
        average_mbr: (sums.0 / count, sums.1 / count, sums.2 / count, sums.3 / count),
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tree Height (#levels): {}", self.height)?;
        writeln!(f, "#Nodes in Rtree: {}", self.node_count)?;
        writeln!(f, "#Entries in Rtree: {}", self.entry_count)?;
        writeln!(f)?;
        for level in &self.levels {
            let (x_low, x_high, y_low, y_high) = level.average_mbr;
            writeln!(
                f,
                "Level {}:\t#Nodes: {:4},\tAverage MBR area: {},\t Average MBR: ({:?}, {:?}, {:?}, {:?})",
                level.level, level.node_count, level.average_area, x_low, x_high, y_low, y_high
            )?;
        }
        Ok(())
    }
}
