//! Flat export records for persistence.
//!
//! Records come out in ancestors-first order, so every record's parent is
//! already emitted (and, once persisted, already has an identifier) when
//! the record itself is reached. Regions nested inside a function body are
//! not exported; the enclosing function stands for them.

use crate::aggregator::{average_cyclomatic_complexity, Region, RegionTree};
use crate::parser::RegionKind;
use log::debug;
use serde::{Deserialize, Serialize};

/// Complexity figure carried by a record, depending on its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComplexitySummary {
    Function { cyclomatic_complexity: u64 },
    Container { average_cyclomatic_complexity: f64 },
}

/// One persisted region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub kind: RegionKind,
    pub name: String,

    /// Index of the parent record in the same export list; `None` for the file
    pub parent: Option<usize>,

    pub line_begin: u32,
    pub total_lines: u64,
    pub own_code_lines: u64,
    pub own_comment_lines: u64,
    pub total_code_lines: u64,
    pub total_comment_lines: u64,
    pub ccn_sum: u64,
    pub n_functions: u64,

    #[serde(flatten)]
    pub complexity: ComplexitySummary,
}

impl ExportRecord {
    fn from_region(region: &Region, parent: Option<usize>) -> Self {
        let complexity = match region.kind {
            RegionKind::Function => ComplexitySummary::Function {
                cyclomatic_complexity: region.cyclomatic_complexity.unwrap_or(region.ccn_sum),
            },
            RegionKind::Unknown
            | RegionKind::Global
            | RegionKind::Class
            | RegionKind::Interface
            | RegionKind::Namespace
            | RegionKind::Struct => ComplexitySummary::Container {
                average_cyclomatic_complexity: average_cyclomatic_complexity(
                    region.ccn_sum,
                    region.n_functions,
                ),
            },
        };

        Self {
            kind: region.kind,
            name: region.name.clone(),
            parent,
            line_begin: region.line_begin,
            total_lines: region.total_lines,
            own_code_lines: region.own_code_lines,
            own_comment_lines: region.own_comment_lines,
            total_code_lines: region.total_code_lines,
            total_comment_lines: region.total_comment_lines,
            ccn_sum: region.ccn_sum,
            n_functions: region.n_functions,
            complexity,
        }
    }

    pub fn cyclomatic_complexity(&self) -> Option<u64> {
        match self.complexity {
            ComplexitySummary::Function {
                cyclomatic_complexity,
            } => Some(cyclomatic_complexity),
            ComplexitySummary::Container { .. } => None,
        }
    }

    pub fn average_cyclomatic_complexity(&self) -> Option<f64> {
        match self.complexity {
            ComplexitySummary::Container {
                average_cyclomatic_complexity,
            } => Some(average_cyclomatic_complexity),
            ComplexitySummary::Function { .. } => None,
        }
    }
}

/// Convert a finished tree into ancestors-first export records
///
/// **Public** - main entry point for export
///
/// Skips every region whose `is_inside_function` is set.
pub fn export_records(tree: &RegionTree) -> Vec<ExportRecord> {
    let mut record_index: Vec<Option<usize>> = vec![None; tree.len()];
    let mut records = Vec::with_capacity(tree.len());
    let mut skipped = 0usize;

    for id in tree.ancestors_first() {
        let region = tree.get(id);
        if region.is_inside_function {
            skipped += 1;
            continue;
        }

        let parent = region.parent.and_then(|parent| record_index[parent.index()]);
        record_index[id.index()] = Some(records.len());
        records.push(ExportRecord::from_region(region, parent));
    }

    debug!(
        "Exported {} records, skipped {} regions inside functions",
        records.len(),
        skipped
    );
    records
}

/// Check that every record's parent precedes it
///
/// **Public** - used when validating a written report
///
/// # Returns
/// Indices of records whose parent reference is missing or points forward
pub fn find_order_violations(records: &[ExportRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(index, record)| match record.parent {
            Some(parent) => parent >= *index,
            None => *index != 0,
        })
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{parse_report, BuildOptions};

    const REPORT: &str = r#"<view><data><file-data><regions>
<region><info type="global" name="__global__" line_begin="1" line_end="30"/>
  <data><std.code.lines code="1" comments="0" preprocessor="0"/></data>
  <subregions>
    <subregion><info type="class" name="Empty" line_begin="2" line_end="3"/>
      <data><std.code.lines code="2" comments="0" preprocessor="0"/></data>
    </subregion>
    <subregion><info type="function" name="free" line_begin="5" line_end="9"/>
      <data><std.code.lines code="4" comments="1" preprocessor="0"/><std.code.complexity cyclomatic="1"/></data>
    </subregion>
  </subregions>
</region>
</regions></file-data></data></view>"#;

    #[test]
    fn test_records_reference_earlier_parents() {
        let parsed = parse_report(REPORT, &BuildOptions::default()).unwrap();
        let records = export_records(&parsed.tree);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "__global__");
        assert_eq!(records[0].parent, None);
        assert!(records[1..].iter().all(|r| r.parent == Some(0)));
        assert!(find_order_violations(&records).is_empty());
    }

    #[test]
    fn test_container_without_functions_averages_zero() {
        let parsed = parse_report(REPORT, &BuildOptions::default()).unwrap();
        let records = export_records(&parsed.tree);

        let empty = records.iter().find(|r| r.name == "Empty").unwrap();
        assert_eq!(empty.average_cyclomatic_complexity(), Some(0.0));
        assert_eq!(empty.cyclomatic_complexity(), None);

        let free = records.iter().find(|r| r.name == "free").unwrap();
        assert_eq!(free.cyclomatic_complexity(), Some(2));
        assert_eq!(free.average_cyclomatic_complexity(), None);
    }

    #[test]
    fn test_regions_inside_functions_are_skipped() {
        let mut tree = parse_report(REPORT, &BuildOptions::default()).unwrap().tree;
        let free = tree
            .post_order()
            .iter()
            .copied()
            .find(|id| tree.get(*id).name == "free")
            .unwrap();
        let local = tree.attach_region(free, RegionKind::Class, "Local");
        tree.attach_region(local, RegionKind::Function, "call");

        let records = export_records(&tree);

        assert_eq!(tree.len(), 5);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.name != "Local" && r.name != "call"));
        assert!(find_order_violations(&records).is_empty());

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        for record in &records[1..] {
            assert_eq!(record.parent, Some(0));
            assert_ne!(names[record.parent.unwrap()], "free");
        }
    }

    #[test]
    fn test_forward_parent_is_a_violation() {
        let parsed = parse_report(REPORT, &BuildOptions::default()).unwrap();
        let mut records = export_records(&parsed.tree);
        records[1].parent = Some(2);
        assert_eq!(find_order_violations(&records), vec![1]);
    }
}
