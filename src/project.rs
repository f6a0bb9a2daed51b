//! Per-project state threaded through a batch run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A project being analyzed and its running counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,

    /// Where the project came from, if known
    pub url: Option<String>,

    /// Checked-out source tree
    pub source_dir: PathBuf,

    pub files_analyzed: u64,
    pub files_with_errors: u64,

    /// Files whose report needed operator-name sanitizing
    pub files_sanitized: u64,

    /// Set once the project-wide metrics collection has run
    #[serde(skip)]
    pub metrics_collected: bool,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            url: None,
            source_dir: source_dir.into(),
            files_analyzed: 0,
            files_with_errors: 0,
            files_sanitized: 0,
            metrics_collected: false,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Derive a project name from a repository URL or directory
///
/// `https://github.com/google/gson.git` and `/work/gson/` both give `gson`.
pub fn project_name_from(location: &str) -> String {
    let trimmed = location.trim_end_matches('/');
    let last = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_from_url() {
        assert_eq!(project_name_from("https://github.com/google/gson"), "gson");
        assert_eq!(project_name_from("https://github.com/google/gson.git"), "gson");
        assert_eq!(project_name_from("/work/checkouts/gson/"), "gson");
        assert_eq!(project_name_from("gson"), "gson");
    }
}
