//! Parse command implementation.
//!
//! Runs one saved nested-region report through the tree builder and the
//! export adapter without invoking any external tool.

use crate::aggregator::{parse_report, summarize_tree, BuildOptions};
use crate::commands::analyze::{build_metrics_report, persist_parsed, print_report_summary};
use crate::commands::models::ParseArgs;
use crate::export::{MemoryStore, RegionStore};
use crate::output::{write_report, FileReport};
use crate::parser::{LineCounts, SourceFile};
use crate::project::{project_name_from, ProjectInfo};
use crate::utils::config::ComplexityCorrection;
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;

/// Execute the parse command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * The report cannot be read
/// * The report is malformed even after sanitizing
/// * The output file cannot be written
pub fn execute_parse(args: ParseArgs) -> Result<()> {
    validate_parse_args(&args)?;

    let raw = fs::read_to_string(&args.report)
        .with_context(|| format!("Failed to read report {}", args.report.display()))?;

    let options = BuildOptions {
        correction: ComplexityCorrection::new(args.complexity_bias),
    };
    let parsed = parse_report(&raw, &options)
        .with_context(|| format!("Failed to parse report {}", args.report.display()))?;

    if parsed.sanitized {
        info!("Report needed operator-name sanitizing");
    }
    for anomaly in &parsed.anomalies {
        warn!("{} (line {}): {:?}", anomaly.region, anomaly.line_begin, anomaly.kind);
    }

    let path = args
        .source_path
        .clone()
        .unwrap_or_else(|| args.report.display().to_string());
    let mut project = ProjectInfo::new(project_name_from(&path), ".");
    let file = SourceFile {
        path: path.clone(),
        language: String::new(),
        line_counts: LineCounts::default(),
    };

    let mut store = MemoryStore::new();
    let project_id = store.add_project(&project)?;
    let file_id = store.add_file(project_id, &file)?;
    let regions = persist_parsed(&mut store, file_id, &parsed)?;

    project.files_analyzed = 1;
    project.files_sanitized = u64::from(parsed.sanitized);
    info!("{}: {}", path, summarize_tree(&parsed.tree).summary());

    let report = build_metrics_report(
        project,
        vec![FileReport {
            path,
            language: None,
            file_id: Some(file_id),
            line_counts: None,
            sanitized: parsed.sanitized,
            regions,
            anomalies: parsed.anomalies,
            error: None,
        }],
    );

    if let Some(output) = &args.output_json {
        write_report(&report, output).context("Failed to write metrics report")?;
        info!("✓ Metrics report written to: {}", output.display());
    }

    if args.print_summary {
        print_report_summary(&report);
    }

    Ok(())
}

/// Validate parse arguments before doing any work
pub fn validate_parse_args(args: &ParseArgs) -> Result<()> {
    if args.report.as_os_str().is_empty() {
        anyhow::bail!("Report path cannot be empty");
    }

    if !args.report.is_file() {
        anyhow::bail!("Report file does not exist: {}", args.report.display());
    }

    Ok(())
}
