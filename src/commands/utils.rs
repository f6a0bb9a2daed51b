use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a metrics report JSON file
///
/// Besides parsing, checks that every file's regions are ancestors-first
/// and that parent references resolve.
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    if report.version != SCHEMA_VERSION {
        println!(
            "  Warning: schema version {} (current is {})",
            report.version, SCHEMA_VERSION
        );
    }

    let problems = report.find_problems();
    if !problems.is_empty() {
        for problem in &problems {
            println!("  ✗ {}", problem);
        }
        anyhow::bail!("{} problem(s) found in {}", problems.len(), file_path.display());
    }

    println!("✓ Valid metrics report");
    println!("  Version: {}", report.version);
    println!("  Project: {}", report.project.name);
    println!("  Files: {}", report.files.len());
    println!("  Regions: {}", report.region_count());
    println!("  Anomalies: {}", report.anomaly_count());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Region Metrics Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  project: object            - Project name, url and counters");
        println!("  files: array               - One entry per handled file");
        println!("    path: string             - Source path");
        println!("    sanitized: bool          - Report needed operator-name repair");
        println!("    regions: array           - Regions, ancestors first");
        println!("      id: number             - Identifier from the store");
        println!("      parent_id: number?     - Identifier of the container");
        println!("      kind: string           - global/namespace/class/struct/interface/function");
        println!("      own_*/total_* lines    - Own and rolled-up line counts");
        println!("      ccn_sum, n_functions   - Complexity sum and function count");
        println!("      cyclomatic_complexity  - Functions only");
        println!("      average_cyclomatic_complexity - Containers only");
        println!("    anomalies: array         - Recoverable report problems");
        println!("    error: string?           - Why the file was skipped");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("region-metrics v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Per-region code metrics from metrix++ nested-region reports.");
}
