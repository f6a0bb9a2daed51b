//! Region Metrics
//!
//! Per-region code metrics from metrix++ nested-region reports.
//!
//! A report describes one source file as nested regions (namespaces,
//! classes, functions). This crate repairs and parses the report, builds a
//! tree with rolled-up line and complexity totals, and exports it
//! ancestors-first so every region can reference its persisted container.
//!
//! ## Getting Started
//!
//! ```bash
//! region-metrics parse --report Foo.xml --output foo.json
//! region-metrics analyze --source-dir ./gson --output metrics.json
//! ```

pub mod aggregator;
pub mod commands;
pub mod export;
pub mod output;
pub mod parser;
pub mod project;
pub mod tools;
pub mod utils;
