//! Analyze command implementation.
//!
//! The analyze command:
//! 0. Clones the repository when only a URL is given
//! 1. Reads (or produces) per-file line counts
//! 2. Keeps files written in a handled language
//! 3. Runs the project-wide metrics collection once
//! 4. Parses each file's report into an aggregated region tree
//! 5. Exports and persists the regions ancestors-first
//! 6. Writes the JSON metrics report

use crate::aggregator::{parse_report, summarize_tree, BuildOptions, ParsedReport};
use crate::commands::models::AnalyzeArgs;
use crate::export::{
    export_records, persist_file, MemoryStore, RecordId, RegionStore, SqliteStore, StoredRegion,
};
use crate::output::{write_report, FileReport, MetricsReport};
use crate::parser::{parse_line_counts, SourceFile};
use crate::project::{project_name_from, ProjectInfo};
use crate::tools::{clone_repository, run_cloc, Checkout, Metrixpp, ReportSource};
use crate::utils::config::{load_config, AnalysisConfig, ToolsConfig, SCHEMA_VERSION};
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info, warn};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Config or line-count input cannot be read
/// * The project-wide collection step fails
/// * The report file cannot be written
///
/// Failures of a single file are recorded in the report and do not stop
/// the run.
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ToolsConfig::default(),
    };
    if let Some(bias) = args.complexity_bias {
        config.analysis.complexity_bias = bias;
    }

    let name = project_name_for(&args)
        .context("A source directory or a repository URL is required")?;
    info!("Start processing of project: {}", name);

    // Dropped at the end of the run; a temporary clone is removed then.
    let checkout = checkout_for(&args, &config, &name)?;
    let source_dir = checkout.path().to_path_buf();

    let mut project = ProjectInfo::new(name, &source_dir);
    if let Some(url) = &args.url {
        project = project.with_url(url);
    }

    let line_counts_json = match &args.line_counts {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read line counts {}", path.display()))?,
        None => run_cloc(&config.cloc, &source_dir).context("Failed to run line counter")?,
    };
    let files = parse_line_counts(&line_counts_json).context("Failed to parse line counts")?;
    info!("Line counter reported {} files", files.len());

    let mut source = Metrixpp::new(config.metrixpp.clone());
    let mut store: Box<dyn RegionStore> = match &args.database {
        Some(path) => Box::new(
            SqliteStore::open(path)
                .with_context(|| format!("Failed to open database {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };
    let file_reports = analyze_project(
        &mut project,
        &files,
        &config.analysis,
        &mut source,
        store.as_mut(),
    )?;

    let report = build_metrics_report(project, file_reports);
    write_report(&report, &args.output_json).context("Failed to write metrics report")?;
    info!("✓ Metrics report written to: {}", args.output_json.display());

    if args.print_summary {
        print_report_summary(&report);
    }

    info!(
        "Analysis of {} completed in {:.2}s",
        report.project.name,
        start_time.elapsed().as_secs_f64()
    );
    drop(checkout);
    Ok(())
}

/// Explicit name, else the last segment of the URL, else of the directory
fn project_name_for(args: &AnalyzeArgs) -> Option<String> {
    args.project_name
        .clone()
        .or_else(|| args.url.as_deref().map(project_name_from))
        .or_else(|| {
            args.source_dir
                .as_ref()
                .map(|dir| project_name_from(&dir.to_string_lossy()))
        })
}

/// Use an existing source tree, or clone the URL into `--source-dir` (or `./<name>`)
fn checkout_for(args: &AnalyzeArgs, config: &ToolsConfig, name: &str) -> Result<Checkout> {
    match (&args.source_dir, &args.url) {
        (Some(dir), _) if dir.is_dir() => Ok(Checkout::existing(dir)),
        (dir, Some(url)) => {
            let destination = dir.clone().unwrap_or_else(|| PathBuf::from(name));
            clone_repository(&config.git, url, &destination, args.keep_checkout)
                .with_context(|| format!("Failed to clone {}", url))
        }
        (Some(dir), None) => anyhow::bail!("Source directory does not exist: {}", dir.display()),
        (None, None) => anyhow::bail!("A source directory or a repository URL is required"),
    }
}

/// Run every handled file of a project through the parse/export/persist pipeline
///
/// **Public** - the batch driver, independent of the concrete tools and store
///
/// # Errors
/// * The report source cannot prepare the project
/// * The store rejects a row
pub fn analyze_project<R, S>(
    project: &mut ProjectInfo,
    files: &[SourceFile],
    analysis: &AnalysisConfig,
    source: &mut R,
    store: &mut S,
) -> Result<Vec<FileReport>>
where
    R: ReportSource + ?Sized,
    S: RegionStore + ?Sized,
{
    let options = BuildOptions {
        correction: analysis.correction(),
    };
    let project_id = store.add_project(project).context("Failed to store project")?;
    let mut reports = Vec::new();

    for file in files {
        if !analysis.handles_language(&file.language) {
            debug!("No handler for {} ({})", file.path, file.language);
            continue;
        }

        source
            .prepare(project)
            .context("Project-wide metrics collection failed")?;

        info!("Start handling file {}", file.path);
        let file_id = store
            .add_file(project_id, file)
            .with_context(|| format!("Failed to store file {}", file.path))?;
        let mut report = FileReport {
            path: file.path.clone(),
            language: Some(file.language.clone()),
            file_id: Some(file_id),
            line_counts: Some(file.line_counts),
            sanitized: false,
            regions: Vec::new(),
            anomalies: Vec::new(),
            error: None,
        };

        let raw = match source.report_for(Path::new(&file.path)) {
            Ok(raw) => raw,
            Err(e) => {
                reports.push(mark_failed(project, report, e));
                continue;
            }
        };
        let parsed = match parse_report(&raw, &options) {
            Ok(parsed) => parsed,
            Err(e) => {
                reports.push(mark_failed(project, report, e));
                continue;
            }
        };

        report.regions = persist_parsed(store, file_id, &parsed)
            .with_context(|| format!("Failed to store regions of {}", file.path))?;
        report.sanitized = parsed.sanitized;
        report.anomalies = parsed.anomalies;

        project.files_analyzed += 1;
        if report.sanitized {
            project.files_sanitized += 1;
        }
        info!("OK {}: {}", file.path, summarize_tree(&parsed.tree).summary());
        reports.push(report);
    }

    info!(
        "Project {}: {} files analyzed, {} with errors",
        project.name, project.files_analyzed, project.files_with_errors
    );
    Ok(reports)
}

/// Validate analyze arguments before running any tool
///
/// **Public** - called by main.rs before execution
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    match (&args.source_dir, &args.url) {
        (None, None) => anyhow::bail!("Either --source-dir or --url must be given"),
        (Some(dir), None) if !dir.is_dir() => {
            anyhow::bail!("Source directory does not exist: {}", dir.display())
        }
        (_, Some(url)) if url.trim().is_empty() => anyhow::bail!("Repository URL cannot be empty"),
        _ => {}
    }

    if let Some(name) = &args.project_name {
        if name.trim().is_empty() {
            anyhow::bail!("Project name cannot be blank");
        }
    }

    if let Some(path) = &args.line_counts {
        if !path.is_file() {
            anyhow::bail!("Line counts file does not exist: {}", path.display());
        }
    }

    crate::output::validate_path(&args.output_json)?;

    Ok(())
}

fn mark_failed(project: &mut ProjectInfo, mut report: FileReport, error: impl Display) -> FileReport {
    warn!("Skipping {}: {}", report.path, error);
    project.files_with_errors += 1;
    report.error = Some(error.to_string());
    report
}

/// Export a parsed report and persist it, returning the stored rows
///
/// **Public** - shared by the analyze and parse commands
pub fn persist_parsed<S: RegionStore + ?Sized>(
    store: &mut S,
    file_id: RecordId,
    parsed: &ParsedReport,
) -> Result<Vec<StoredRegion>, crate::utils::error::StoreError> {
    let records = export_records(&parsed.tree);
    let ids = persist_file(store, file_id, &records)?;

    Ok(records
        .into_iter()
        .zip(&ids)
        .map(|(record, id)| StoredRegion {
            id: *id,
            file_id,
            parent_id: record.parent.and_then(|parent| ids.get(parent).copied()),
            record,
        })
        .collect())
}

/// Assemble the versioned report
pub fn build_metrics_report(project: ProjectInfo, files: Vec<FileReport>) -> MetricsReport {
    use chrono::Utc;

    MetricsReport {
        version: SCHEMA_VERSION.to_string(),
        project,
        files,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Print a human-readable project summary to stdout.
///
/// **Public** - also used by the parse command
pub fn print_report_summary(report: &MetricsReport) {
    println!();
    println!("{}", "  REGION METRICS SUMMARY".bold());
    println!("  Project:        {}", report.project.name);
    println!("  Files analyzed: {}", report.project.files_analyzed);
    if report.project.files_with_errors > 0 {
        println!(
            "  Files failed:   {}",
            report.project.files_with_errors.to_string().red()
        );
    }
    println!("  Sanitized:      {}", report.project.files_sanitized);
    println!("  Regions:        {}", report.region_count());
    if report.anomaly_count() > 0 {
        println!("  Anomalies:      {}", report.anomaly_count().to_string().yellow());
    }

    let mut functions: Vec<(&str, &str, u64)> = report
        .files
        .iter()
        .flat_map(|file| {
            file.regions.iter().filter_map(move |region| {
                region
                    .record
                    .cyclomatic_complexity()
                    .map(|ccn| (file.path.as_str(), region.record.name.as_str(), ccn))
            })
        })
        .collect();
    functions.sort_by(|a, b| b.2.cmp(&a.2));

    if !functions.is_empty() {
        println!();
        println!("  Most complex functions:");
        for (path, name, ccn) in functions.iter().take(10) {
            println!("    {:>4}  {} ({})", ccn.to_string().cyan(), name, path);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_name_prefers_explicit_then_url() {
        let mut args = AnalyzeArgs {
            source_dir: Some(PathBuf::from("/work/checkout")),
            url: Some("https://github.com/google/gson.git".to_string()),
            ..Default::default()
        };
        assert_eq!(project_name_for(&args).as_deref(), Some("gson"));

        args.project_name = Some("Gson".to_string());
        assert_eq!(project_name_for(&args).as_deref(), Some("Gson"));

        args.project_name = None;
        args.url = None;
        assert_eq!(project_name_for(&args).as_deref(), Some("checkout"));
    }

    #[test]
    fn test_existing_source_dir_is_not_cloned() {
        let dir = TempDir::new().unwrap();
        let args = AnalyzeArgs {
            source_dir: Some(dir.path().to_path_buf()),
            url: Some("https://example.invalid/never-cloned.git".to_string()),
            ..Default::default()
        };

        let checkout = checkout_for(&args, &ToolsConfig::default(), "never-cloned").unwrap();
        assert_eq!(checkout.path(), dir.path());
        assert!(!checkout.is_temporary());
        drop(checkout);
        assert!(dir.path().exists());
    }

    #[test]
    fn test_clone_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut config = ToolsConfig::default();
        config.git.path = "/nonexistent/git-binary".into();
        let args = AnalyzeArgs {
            source_dir: Some(dir.path().join("gson")),
            url: Some("https://github.com/google/gson.git".to_string()),
            ..Default::default()
        };

        let err = checkout_for(&args, &config, "gson").unwrap_err();
        assert!(err.to_string().contains("Failed to clone"));
    }

    #[test]
    fn test_validate_requires_dir_or_url() {
        assert!(validate_args(&AnalyzeArgs::default()).is_err());

        let missing = AnalyzeArgs {
            source_dir: Some(PathBuf::from("/nonexistent/project")),
            ..Default::default()
        };
        assert!(validate_args(&missing).is_err());

        let clone_target = AnalyzeArgs {
            source_dir: Some(PathBuf::from("/nonexistent/project")),
            url: Some("https://github.com/google/gson".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&clone_target).is_ok());
    }
}
