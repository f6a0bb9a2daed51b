//! Aggregation of report regions into a metric tree.
//!
//! This module transforms a parsed report into:
//! - An arena-backed region tree with rolled-up totals
//! - A post-order list that reverses into ancestors-first order
//! - Whole-file summary statistics

pub mod metrics;
pub mod region_tree;

// Re-export main types and functions
pub use metrics::{average_cyclomatic_complexity, summarize_tree, TreeSummary};
pub use region_tree::{
    build_region_tree, parse_report, Anomaly, AnomalyKind, BuildOptions, ParsedReport, Region,
    RegionId, RegionTree,
};
