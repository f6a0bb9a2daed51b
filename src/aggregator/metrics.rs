//! Summary statistics over a finished region tree.

use super::region_tree::RegionTree;
use crate::parser::RegionKind;
use log::debug;
use serde::Serialize;

/// Average complexity of the functions summarized by `ccn_sum` / `n_functions`
///
/// Zero when there are no functions.
pub fn average_cyclomatic_complexity(ccn_sum: u64, n_functions: u64) -> f64 {
    if n_functions == 0 {
        0.0
    } else {
        ccn_sum as f64 / n_functions as f64
    }
}

/// Whole-file statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeSummary {
    /// Number of regions in the tree, functions included
    pub regions: usize,

    pub functions: u64,
    pub total_code_lines: u64,
    pub total_comment_lines: u64,
    pub average_complexity: f64,

    /// Most complex function and its corrected complexity
    pub most_complex: Option<(String, u64)>,

    /// Deepest nesting below the file region
    pub max_depth: usize,
}

/// Summarize a region tree
///
/// **Public** - used for per-file log lines and the `--summary` output
pub fn summarize_tree(tree: &RegionTree) -> TreeSummary {
    let root = tree.root();

    let most_complex = tree
        .post_order()
        .iter()
        .map(|id| tree.get(*id))
        .filter(|region| region.kind == RegionKind::Function)
        .filter_map(|region| region.cyclomatic_complexity.map(|c| (region, c)))
        .max_by_key(|(_, complexity)| *complexity)
        .map(|(region, complexity)| (region.name.clone(), complexity));

    let max_depth = tree
        .post_order()
        .iter()
        .map(|id| tree.depth(*id))
        .max()
        .unwrap_or(0);

    let summary = TreeSummary {
        regions: tree.len(),
        functions: root.n_functions,
        total_code_lines: root.total_code_lines,
        total_comment_lines: root.total_comment_lines,
        average_complexity: average_cyclomatic_complexity(root.ccn_sum, root.n_functions),
        most_complex,
        max_depth,
    };
    debug!("Tree summary: {}", summary.summary());
    summary
}

impl TreeSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        let hottest = match &self.most_complex {
            Some((name, complexity)) => format!("{} ({})", name, complexity),
            None => "-".to_string(),
        };
        format!(
            "Regions: {} | Functions: {} | Code: {} | Comments: {} | Avg CCN: {:.2} | Max CCN: {}",
            self.regions,
            self.functions,
            self.total_code_lines,
            self.total_comment_lines,
            self.average_complexity,
            hottest
        )
    }
}
