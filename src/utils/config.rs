//! Configuration and constants for the CLI.
//!
//! Constants describe the report format and defaults; [`ToolsConfig`] is the
//! optional TOML file that points at the external tools.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// metrix++ reports cyclomatic complexity one less than the true value.
// Observed on metrix++ 1.x; revisit when the tool version changes.
pub const DEFAULT_COMPLEXITY_BIAS: u64 = 1;

// Operator names metrix++ writes into attributes without escaping.
// Longest first so "operator<<" is matched before "operator<".
pub const OPERATOR_TOKENS: &[&str] = &["<<", ">>", "<=", ">=", "&&", "<", ">", "&"];

/// Languages handled by default (names as reported by the line counter)
pub const DEFAULT_LANGUAGES: &[&str] = &["Java", "C#", "C", "C++", "C/C++ Header"];

pub const DEFAULT_PYTHON: &str = "python2.7";
pub const DEFAULT_METRIXPP_SCRIPT: &str = "metrix++.py";
pub const DEFAULT_METRIXPP_DB: &str = "metrixpp.db";
pub const DEFAULT_CLOC: &str = "cloc";
pub const DEFAULT_GIT: &str = "git";

/// Correction applied to the raw cyclomatic complexity of every function.
///
/// The bias is a property of the analysis tool's version, so it is carried
/// as configuration rather than baked into the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityCorrection {
    pub bias: u64,
}

impl ComplexityCorrection {
    pub fn new(bias: u64) -> Self {
        Self { bias }
    }

    /// Corrected complexity for a raw reported value
    pub fn apply(&self, raw: u64) -> u64 {
        raw.saturating_add(self.bias)
    }
}

impl Default for ComplexityCorrection {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLEXITY_BIAS)
    }
}

/// Complete tools configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub metrixpp: MetrixppConfig,

    #[serde(default)]
    pub cloc: ClocConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// How to run metrix++
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetrixppConfig {
    /// Python 2.7 interpreter
    pub python: PathBuf,

    /// Path to metrix++.py
    pub script: PathBuf,

    /// Temporary metrics database written by `collect`
    pub db_file: PathBuf,
}

impl Default for MetrixppConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from(DEFAULT_PYTHON),
            script: PathBuf::from(DEFAULT_METRIXPP_SCRIPT),
            db_file: PathBuf::from(DEFAULT_METRIXPP_DB),
        }
    }
}

/// How to run the line counter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClocConfig {
    pub path: PathBuf,
}

impl Default for ClocConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CLOC),
        }
    }
}

/// How to run git when a project is given by URL
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    pub path: PathBuf,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_GIT),
        }
    }
}

/// Analysis settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub complexity_bias: u64,
    pub languages: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            complexity_bias: DEFAULT_COMPLEXITY_BIAS,
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl AnalysisConfig {
    pub fn correction(&self) -> ComplexityCorrection {
        ComplexityCorrection::new(self.complexity_bias)
    }

    pub fn handles_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}

/// Load the tools configuration from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
pub fn load_config(path: impl AsRef<Path>) -> Result<ToolsConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ToolsConfig = toml::from_str(&contents)?;
    Ok(config)
}
