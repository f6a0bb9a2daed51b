use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Project directory; the clone destination when it does not exist yet
    pub source_dir: Option<PathBuf>,

    /// Project name (derived from the URL or directory when absent)
    pub project_name: Option<String>,

    /// Repository URL, cloned when no source tree exists
    pub url: Option<String>,

    /// Keep a cloned tree after the run
    pub keep_checkout: bool,

    /// SQLite database receiving the stored rows; kept in memory when absent
    pub database: Option<PathBuf>,

    /// Saved line-counter JSON; the line counter runs when absent
    pub line_counts: Option<PathBuf>,

    /// Tools configuration file (TOML)
    pub config: Option<PathBuf>,

    /// Output path for the JSON metrics report
    pub output_json: PathBuf,

    /// Overrides the configured complexity bias
    pub complexity_bias: Option<u64>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            source_dir: None,
            project_name: None,
            url: None,
            keep_checkout: false,
            database: None,
            line_counts: None,
            config: None,
            output_json: PathBuf::from("metrics.json"),
            complexity_bias: None,
            print_summary: false,
        }
    }
}

/// Arguments for the parse command
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Saved nested-region report of one file
    pub report: PathBuf,

    /// Source path recorded for the file (defaults to the report path)
    pub source_path: Option<String>,

    /// Output path for the JSON metrics report (optional)
    pub output_json: Option<PathBuf>,

    pub complexity_bias: u64,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ParseArgs {
    fn default() -> Self {
        Self {
            report: PathBuf::new(),
            source_path: None,
            output_json: None,
            complexity_bias: crate::utils::config::DEFAULT_COMPLEXITY_BIAS,
            print_summary: true,
        }
    }
}
