//! End-to-end tests: parse records, bulk load, query and persist.

use std::io::Cursor;

use str_rtree::rtree::{load_snapshot, save_dump, save_snapshot};
use str_rtree::{
    parse_entries, parse_queries, Predicate, RTreeConfig, SpatialError, StrRTree, TreeStats,
};
use tempfile::tempdir;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const FOUR_SQUARES: &str = "1\t0\t1\t0\t1\n2\t2\t3\t0\t1\n3\t0\t1\t2\t3\n4\t2\t3\t2\t3\n";

fn grid_records(n: usize) -> String {
    (0..n)
        .map(|i| {
            let x = (i % 25) as f64 * 2.0;
            let y = (i / 25) as f64 * 2.0;
            format!("{}\t{}\t{}\t{}\t{}\n", i, x, x + 1.0, y, y + 1.0)
        })
        .collect()
}

#[test]
fn test_four_squares_end_to_end() {
    init_logger();
    let entries = parse_entries(Cursor::new(FOUR_SQUARES)).unwrap();
    let tree = StrRTree::build(entries, 2).unwrap();
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.height(), 2);

    let queries = parse_queries(Cursor::new("a\t-1\t4\t-1\t4\nb\t0.4\t0.6\t0.4\t0.6\n")).unwrap();

    let wide = tree.range_search(&queries[0].rect, Predicate::Intersects);
    assert_eq!(wide.len(), 4);
    assert_eq!(wide.visited, 3);

    let inside = tree.range_search(&queries[0].rect, Predicate::Inside);
    assert_eq!(inside.len(), 4);
    assert_eq!(inside.visited, 3);

    let point = tree.range_search(&queries[1].rect, Predicate::Contains);
    assert_eq!(point.hits, vec![1]);
    assert_eq!(point.visited, 2);
}

#[test]
fn test_default_config_on_larger_input() {
    init_logger();
    let entries = parse_entries(Cursor::new(grid_records(1000))).unwrap();
    let config = RTreeConfig::default();
    let tree = StrRTree::build_with_config(entries, &config).unwrap();

    assert_eq!(tree.capacity(), 28);
    assert_eq!(tree.leaf_count(), 36);
    assert_eq!(tree.len(), 1000);
    assert!(tree.check_integrity().is_valid);

    let stats = TreeStats::collect(&tree);
    assert_eq!(stats.levels.len(), tree.height() as usize);
    assert_eq!(stats.levels[0].node_count, 36);
    assert_eq!(stats.levels.last().map(|l| l.node_count), Some(1));
}

#[test]
fn test_malformed_input_fails_before_build() {
    let input = "1\t0\t1\t0\t1\n2\t0\t1\n";
    let err = parse_entries(Cursor::new(input)).unwrap_err();
    assert!(matches!(err, SpatialError::Parse { line: 2, .. }));

    let entries = parse_entries(Cursor::new("")).unwrap();
    assert!(matches!(
        StrRTree::build(entries, 4),
        Err(SpatialError::EmptyDataset)
    ));
}

#[test]
fn test_dump_and_snapshot_files() {
    init_logger();
    let dir = tempdir().unwrap();
    let entries = parse_entries(Cursor::new(grid_records(300))).unwrap();
    let tree = StrRTree::build(entries, 5).unwrap();

    let dump_path = dir.path().join("rtree.txt");
    save_dump(&tree, &dump_path).unwrap();
    let dump = std::fs::read_to_string(&dump_path).unwrap();
    assert_eq!(dump.lines().count(), tree.node_count() + 2);

    let snapshot_path = dir.path().join("rtree.snapshot");
    save_snapshot(&tree, &snapshot_path).unwrap();
    let loaded = load_snapshot(&snapshot_path).unwrap();
    assert_eq!(loaded, tree);
}

#[test]
fn test_rebuild_is_structurally_identical() {
    let records = grid_records(500);
    let first = StrRTree::build(parse_entries(Cursor::new(&records)).unwrap(), 3).unwrap();
    let second = StrRTree::build(parse_entries(Cursor::new(&records)).unwrap(), 3).unwrap();
    assert_eq!(first, second);
}
