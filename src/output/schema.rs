//! Output JSON schema definitions for metrics reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::Anomaly;
use crate::export::{find_order_violations, ExportRecord, RecordId, StoredRegion};
use crate::parser::LineCounts;
use crate::project::ProjectInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Project counters at the end of the run
    pub project: ProjectInfo,

    /// One entry per handled file, in processing order
    pub files: Vec<FileReport>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Everything recorded for one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub language: Option<String>,

    /// Identifier the store gave the file
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_id: Option<RecordId>,

    /// Counts from the line counter, when it ran
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line_counts: Option<LineCounts>,

    /// Report needed operator-name sanitizing
    #[serde(default)]
    pub sanitized: bool,

    /// Persisted regions, ancestors-first
    #[serde(default)]
    pub regions: Vec<StoredRegion>,

    #[serde(default)]
    pub anomalies: Vec<Anomaly>,

    /// Why the file could not be processed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl MetricsReport {
    pub fn region_count(&self) -> usize {
        self.files.iter().map(|f| f.regions.len()).sum()
    }

    pub fn anomaly_count(&self) -> usize {
        self.files.iter().map(|f| f.anomalies.len()).sum()
    }

    /// Check ordering and parent references of every file
    ///
    /// **Public** - used by the validate command
    ///
    /// # Returns
    /// One message per problem; empty if the report is consistent
    pub fn find_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for file in &self.files {
            let mut seen: HashSet<RecordId> = HashSet::new();

            for (index, region) in file.regions.iter().enumerate() {
                match region.parent_id {
                    Some(parent_id) if !seen.contains(&parent_id) => problems.push(format!(
                        "{}: region {} '{}' references parent {} before it was persisted",
                        file.path, region.id, region.record.name, parent_id
                    )),
                    None if index != 0 => problems.push(format!(
                        "{}: region {} '{}' has no parent but is not the file region",
                        file.path, region.id, region.record.name
                    )),
                    _ => {}
                }
                seen.insert(region.id);
            }

            let records: Vec<ExportRecord> =
                file.regions.iter().map(|r| r.record.clone()).collect();
            for index in find_order_violations(&records) {
                problems.push(format!(
                    "{}: record {} '{}' is not preceded by its parent",
                    file.path, index, records[index].name
                ));
            }
        }

        problems
    }
}
