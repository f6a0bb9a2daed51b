//! Report parsing.
//!
//! This module handles:
//! - Repairing unescaped operator names in raw reports
//! - Reading the nested region structure of a report
//! - Classifying declared region types
//! - Reading per-file line counts

pub mod line_counts;
pub mod region_kind;
pub mod report;
pub mod sanitizer;

// Re-export main types
pub use line_counts::{parse_line_counts, LineCounts, SourceFile};
pub use region_kind::{classify, RegionKind};
pub use report::{read_top_region, LeafMetrics, LineSpan, ReadOutcome, ReportElement};
pub use sanitizer::sanitize;
