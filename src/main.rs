//! Region Metrics CLI
//!
//! Collects per-region code metrics for a checked-out project, or for a
//! single saved nested-region report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use region_metrics::commands::{
    display_schema, display_version, execute_analyze, execute_parse, validate_args,
    validate_report_file, AnalyzeArgs, ParseArgs,
};
use region_metrics::utils::config::DEFAULT_COMPLEXITY_BIAS;

/// Region Metrics - per-region code metrics from metrix++ reports
#[derive(Parser, Debug)]
#[command(name = "region-metrics")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every handled file of a project
    Analyze {
        /// Project source directory (clone destination with --url)
        #[arg(short, long, required_unless_present = "url")]
        source_dir: Option<PathBuf>,

        /// Project name (defaults to the URL or directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Repository URL, cloned when the source directory does not exist
        #[arg(long)]
        url: Option<String>,

        /// Keep the cloned repository after the run
        #[arg(long, requires = "url")]
        keep: bool,

        /// SQLite database to store projects, files and regions in
        #[arg(long, env = "REGION_METRICS_DATABASE")]
        database: Option<PathBuf>,

        /// Saved `cloc --json --by-file` output instead of running cloc
        #[arg(long)]
        line_counts: Option<PathBuf>,

        /// Tools configuration (TOML)
        #[arg(short, long, env = "REGION_METRICS_CONFIG")]
        config: Option<PathBuf>,

        /// Output path for JSON report
        #[arg(short, long, default_value = "metrics.json")]
        output: PathBuf,

        /// Override the complexity bias from the configuration
        #[arg(long)]
        complexity_bias: Option<u64>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Parse one saved nested-region report
    Parse {
        /// Path to the XML report
        #[arg(short, long)]
        report: PathBuf,

        /// Source path recorded for the file
        #[arg(long)]
        source_path: Option<String>,

        /// Output path for JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Value added to every reported function complexity
        #[arg(long, default_value_t = DEFAULT_COMPLEXITY_BIAS)]
        complexity_bias: u64,

        /// Skip the text summary
        #[arg(long)]
        quiet: bool,
    },

    /// Validate a metrics report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            source_dir,
            name,
            url,
            keep,
            database,
            line_counts,
            config,
            output,
            complexity_bias,
            summary,
        } => {
            let args = AnalyzeArgs {
                source_dir,
                project_name: name,
                url,
                keep_checkout: keep,
                database,
                line_counts,
                config,
                output_json: output,
                complexity_bias,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Parse {
            report,
            source_path,
            output,
            complexity_bias,
            quiet,
        } => {
            execute_parse(ParseArgs {
                report,
                source_path,
                output_json: output,
                complexity_bias,
                print_summary: !quiet,
            })?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
