//! Command line driver for the STR R-Tree.
//!
//! Reads tab-separated rectangles, bulk loads them, prints the STR plan and
//! tree statistics, writes a text dump and runs every query rectangle with
//! each predicate.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use str_rtree::rtree::{save_dump, save_snapshot};
use str_rtree::{
    parse_entries, parse_queries, Node, Predicate, RTreeConfig, StrPlan, StrRTree, TreeStats,
};

const USAGE: &str = "usage: str-rtree <data-file> [--queries <file>] [--dump <file>] \
[--snapshot <file>] [--block-size <bytes>] [--print-tree]";

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, PartialEq)]
struct Options {
    data: PathBuf,
    queries: PathBuf,
    dump: PathBuf,
    snapshot: Option<PathBuf>,
    block_size: usize,
    print_tree: bool,
}

impl Options {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self> {
        let mut data = None;
        let mut options = Options {
            data: PathBuf::new(),
            queries: PathBuf::from("query_rectangles.txt"),
            dump: PathBuf::from("rtree.txt"),
            snapshot: None,
            block_size: str_rtree::rtree::DEFAULT_BLOCK_SIZE,
            print_tree: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--queries" => options.queries = value(&mut args, &arg)?.into(),
                "--dump" => options.dump = value(&mut args, &arg)?.into(),
                "--snapshot" => options.snapshot = Some(value(&mut args, &arg)?.into()),
                "--block-size" => {
                    let raw = value(&mut args, &arg)?;
                    options.block_size = raw
                        .parse()
                        .with_context(|| format!("invalid block size '{}'", raw))?;
                }
                "--print-tree" => options.print_tree = true,
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with("--") => bail!("unknown option '{}'\n{}", flag, USAGE),
                path if data.is_none() => data = Some(PathBuf::from(path)),
                extra => bail!("unexpected argument '{}'\n{}", extra, USAGE),
            }
        }

        options.data = match data {
            Some(path) => path,
            None => bail!("missing data file\n{}", USAGE),
        };
        Ok(options)
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    match args.next() {
        Some(v) => Ok(v),
        None => bail!("option '{}' requires a value", flag),
    }
}

fn banner(title: &str) -> String {
    let left = (RULE_WIDTH - title.len()) / 2;
    let right = RULE_WIDTH - title.len() - left;
    format!("{}{}{}", "-".repeat(left), title, "-".repeat(right))
}

/// One line of the `--print-tree` listing
fn describe_node(node: &Node) -> String {
    format!("Node-id: {}", node)
}

fn run(options: &Options) -> Result<()> {
    let file = File::open(&options.data)
        .with_context(|| format!("cannot open data file {:?}", options.data))?;
    let entries = parse_entries(BufReader::new(file))
        .with_context(|| format!("cannot read data file {:?}", options.data))?;

    let config = RTreeConfig::new().block_size(options.block_size);
    config.validate()?;
    let plan = StrPlan::new(entries.len(), config.capacity())?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", banner("STR calculations"))?;
    writeln!(out, "Max entries per node: {}", plan.capacity)?;
    writeln!(out, "#LeafNodes: {}", plan.leaf_count)?;
    writeln!(out, "#Slices: {}", plan.slice_count)?;
    writeln!(out, "{}\n", "-".repeat(RULE_WIDTH))?;

    let started = Instant::now();
    let tree = StrRTree::build_with_config(entries, &config)?;
    log::info!(
        "Bulk loaded {} entries into {} nodes in {:?}",
        tree.len(),
        tree.node_count(),
        started.elapsed()
    );

    if options.print_tree {
        writeln!(out, "{}", banner("Printing Tree"))?;
        writeln!(out, "Tree Height: {}", tree.height())?;
        for node in tree.pool().iter().rev() {
            writeln!(out, "{}", describe_node(node))?;
        }
        writeln!(out, "{}\n", "-".repeat(RULE_WIDTH))?;
    }

    writeln!(out, "{}", banner("Statistics"))?;
    write!(out, "{}", TreeStats::collect(&tree))?;
    writeln!(out, "{}\n", "-".repeat(RULE_WIDTH))?;

    save_dump(&tree, &options.dump)
        .with_context(|| format!("cannot write dump {:?}", options.dump))?;
    if let Some(path) = &options.snapshot {
        save_snapshot(&tree, path).with_context(|| format!("cannot write snapshot {:?}", path))?;
    }

    let file = File::open(&options.queries)
        .with_context(|| format!("cannot open query file {:?}", options.queries))?;
    let queries = parse_queries(BufReader::new(file))
        .with_context(|| format!("cannot read query file {:?}", options.queries))?;

    for query in &queries {
        writeln!(out, "Query-id: {}", query.id)?;
        for predicate in Predicate::ALL {
            let result = tree.range_search(&query.rect, predicate);
            writeln!(
                out,
                "\t\tPredicate: {:10}, Visited: {:3}, Hits: {}",
                predicate,
                result.visited,
                result.len()
            )?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse(std::env::args().skip(1))?;
    log::debug!("Running with {:?}", options);
    run(&options)
}
