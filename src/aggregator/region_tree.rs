//! Region tree construction and metric rollup.
//!
//! Each report element becomes one [`Region`] in an arena owned by
//! [`RegionTree`]. Children are referenced by index and every node keeps a
//! non-owning parent index, so aggregation can fold upward without shared
//! ownership.
//!
//! # Algorithm
//! 1. Classify the element and read its own line counts
//! 2. Functions take their corrected complexity and stop: declared children
//!    of a function are dropped and recorded as an anomaly
//! 3. Containers recurse into each declared child, then fold the finished
//!    child's totals into themselves
//! 4. A node is appended to the post-order list after all of its children

use crate::parser::report::{read_top_region, ReportElement};
use crate::parser::{classify, RegionKind};
use crate::utils::config::ComplexityCorrection;
use crate::utils::error::ReportError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Index of a region inside its [`RegionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionId(usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A lexical region with its own and aggregated metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub kind: RegionKind,
    pub name: String,
    pub line_begin: u32,
    pub total_lines: u64,

    /// Code lines of this region alone; preprocessor lines count as code
    pub own_code_lines: u64,
    pub own_comment_lines: u64,

    /// Own lines plus the totals of every descendant
    pub total_code_lines: u64,
    pub total_comment_lines: u64,

    /// Sum of corrected complexity over functions in the subtree
    pub ccn_sum: u64,
    pub n_functions: u64,

    pub is_inside_function: bool,
    pub parent: Option<RegionId>,
    pub children: Vec<RegionId>,

    /// Corrected complexity, only for `RegionKind::Function`
    pub cyclomatic_complexity: Option<u64>,
}

/// What went wrong with a region without making the report unusable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// A function declared child regions; they were dropped
    NestedFunction { dropped_children: usize },

    /// A function had no cyclomatic value; raw 0 was assumed
    MissingComplexity,

    /// The declared type is not one of the modeled kinds
    UnknownRegionType { declared: String },
}

/// A non-fatal anomaly recorded against one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(flatten)]
    pub kind: AnomalyKind,
    pub region: String,
    pub line_begin: u32,
}

/// Options for tree construction
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub correction: ComplexityCorrection,
}

/// A fully aggregated region tree for one file
///
/// Handed out read-only: nothing can change a region once the builder
/// returns.
#[derive(Debug, Clone)]
pub struct RegionTree {
    regions: Vec<Region>,
    post_order: Vec<RegionId>,
}

impl RegionTree {
    /// The whole-file region
    pub fn root(&self) -> &Region {
        &self.regions[0]
    }

    pub fn root_id(&self) -> RegionId {
        RegionId(0)
    }

    pub fn get(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in post-order: children before their parent
    pub fn post_order(&self) -> &[RegionId] {
        &self.post_order
    }

    /// Reversed post-order: every region before all of its descendants
    pub fn ancestors_first(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.post_order.iter().rev().copied()
    }

    pub fn children(&self, id: RegionId) -> impl Iterator<Item = &Region> + '_ {
        self.get(id).children.iter().map(|child| self.get(*child))
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: RegionId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }
}

#[cfg(test)]
impl RegionTree {
    /// Attach an empty region under `parent` the way a recursing builder would
    ///
    /// The tree builder never descends into functions, so this is the only way
    /// to obtain regions with `is_inside_function` set.
    pub(crate) fn attach_region(&mut self, parent: RegionId, kind: RegionKind, name: &str) -> RegionId {
        let container = &self.regions[parent.0];
        let is_inside_function = container.is_inside_function || container.kind.is_function();
        let line_begin = container.line_begin;
        let id = RegionId(self.regions.len());

        self.regions.push(Region {
            kind,
            name: name.to_string(),
            line_begin,
            total_lines: 1,
            own_code_lines: 0,
            own_comment_lines: 0,
            total_code_lines: 0,
            total_comment_lines: 0,
            ccn_sum: 0,
            n_functions: 0,
            is_inside_function,
            parent: Some(parent),
            children: Vec::new(),
            cyclomatic_complexity: kind.is_function().then_some(0),
        });
        self.regions[parent.0].children.push(id);

        let position = self
            .post_order
            .iter()
            .position(|entry| *entry == parent)
            .unwrap_or(self.post_order.len());
        self.post_order.insert(position, id);
        id
    }
}

/// Result of parsing one file's report
#[derive(Debug, Clone)]
pub struct ParsedReport {
    pub tree: RegionTree,
    pub anomalies: Vec<Anomaly>,

    /// True if the raw report had to be sanitized before it parsed
    pub sanitized: bool,
}

/// Parse a raw report and build its aggregated region tree
///
/// **Public** - main entry point for one file
///
/// # Errors
/// * `ReportError` - the report is structurally unusable
pub fn parse_report(raw: &str, options: &BuildOptions) -> Result<ParsedReport, ReportError> {
    let outcome = read_top_region(raw, |top| build_region_tree(top, options))?;
    let (tree, anomalies) = outcome.value;

    Ok(ParsedReport {
        tree,
        anomalies,
        sanitized: outcome.sanitized,
    })
}

/// Build the aggregated tree rooted at the top-level report element
///
/// **Public** - lets callers that already hold a parsed report reuse it
pub fn build_region_tree(
    top: ReportElement<'_, '_>,
    options: &BuildOptions,
) -> Result<(RegionTree, Vec<Anomaly>), ReportError> {
    let mut builder = TreeBuilder {
        regions: Vec::new(),
        post_order: Vec::new(),
        anomalies: Vec::new(),
        correction: options.correction,
    };
    builder.visit(top, None)?;

    debug!(
        "Built region tree with {} regions, {} anomalies",
        builder.regions.len(),
        builder.anomalies.len()
    );

    Ok((
        RegionTree {
            regions: builder.regions,
            post_order: builder.post_order,
        },
        builder.anomalies,
    ))
}

struct TreeBuilder {
    regions: Vec<Region>,
    post_order: Vec<RegionId>,
    anomalies: Vec<Anomaly>,
    correction: ComplexityCorrection,
}

impl TreeBuilder {
    fn visit(
        &mut self,
        element: ReportElement<'_, '_>,
        parent: Option<RegionId>,
    ) -> Result<RegionId, ReportError> {
        let declared_type = element.declared_type()?;
        let kind = classify(declared_type);
        let name = element.name()?.to_string();
        let span = element.line_span()?;
        let metrics = element.leaf_metrics()?;

        if kind == RegionKind::Unknown {
            self.record(
                AnomalyKind::UnknownRegionType {
                    declared: declared_type.to_string(),
                },
                &name,
                span.begin,
            );
        }

        let is_inside_function = parent.is_some_and(|parent| {
            let parent = &self.regions[parent.0];
            parent.is_inside_function || parent.kind.is_function()
        });

        let own_code_lines = metrics.code.saturating_add(metrics.preprocessor);
        let own_comment_lines = metrics.comments;

        let id = RegionId(self.regions.len());
        self.regions.push(Region {
            kind,
            name,
            line_begin: span.begin,
            total_lines: span.total_lines(),
            own_code_lines,
            own_comment_lines,
            total_code_lines: own_code_lines,
            total_comment_lines: own_comment_lines,
            ccn_sum: 0,
            n_functions: 0,
            is_inside_function,
            parent,
            children: Vec::new(),
            cyclomatic_complexity: None,
        });
        if let Some(parent) = parent {
            self.regions[parent.0].children.push(id);
        }

        match kind {
            RegionKind::Function => self.finish_function(id, element)?,
            RegionKind::Unknown
            | RegionKind::Global
            | RegionKind::Class
            | RegionKind::Interface
            | RegionKind::Namespace
            | RegionKind::Struct => {
                for child in element.subregions() {
                    let child = self.visit(child, Some(id))?;
                    self.fold_into_parent(child, id);
                }
            }
        }

        self.post_order.push(id);
        Ok(id)
    }

    fn finish_function(
        &mut self,
        id: RegionId,
        element: ReportElement<'_, '_>,
    ) -> Result<(), ReportError> {
        let raw = match element.complexity()? {
            Some(raw) => raw,
            None => {
                self.record_for(id, AnomalyKind::MissingComplexity);
                0
            }
        };
        let complexity = self.correction.apply(raw);

        let region = &mut self.regions[id.0];
        region.cyclomatic_complexity = Some(complexity);
        region.ccn_sum = complexity;
        region.n_functions = 1;

        let dropped_children = element.subregions().count();
        if dropped_children > 0 {
            self.record_for(id, AnomalyKind::NestedFunction { dropped_children });
        }
        Ok(())
    }

    fn fold_into_parent(&mut self, child: RegionId, parent: RegionId) {
        let child = &self.regions[child.0];
        let (code, comments, ccn, functions) = (
            child.total_code_lines,
            child.total_comment_lines,
            child.ccn_sum,
            child.n_functions,
        );

        // Counts come straight from report attributes; totals clamp at u64::MAX.
        let parent = &mut self.regions[parent.0];
        parent.total_code_lines = parent.total_code_lines.saturating_add(code);
        parent.total_comment_lines = parent.total_comment_lines.saturating_add(comments);
        parent.ccn_sum = parent.ccn_sum.saturating_add(ccn);
        parent.n_functions = parent.n_functions.saturating_add(functions);
    }

    fn record_for(&mut self, id: RegionId, kind: AnomalyKind) {
        let region = &self.regions[id.0];
        let (name, line_begin) = (region.name.clone(), region.line_begin);
        self.record(kind, &name, line_begin);
    }

    fn record(&mut self, kind: AnomalyKind, region: &str, line_begin: u32) {
        warn!("Region '{}' (line {}): {:?}", region, line_begin, kind);
        self.anomalies.push(Anomaly {
            kind,
            region: region.to_string(),
            line_begin,
        });
    }
}
