//! External analysis tools.
//!
//! The tree builder never runs a process itself; these suppliers do it and
//! hand over plain text.

pub mod cloc;
pub mod git;
pub mod metrixpp;

pub use cloc::run_cloc;
pub use git::{clone_repository, Checkout};
pub use metrixpp::Metrixpp;

use crate::project::ProjectInfo;
use crate::utils::error::ToolError;
use log::debug;
use std::path::Path;
use std::process::Command;

/// Supplier of raw nested-region reports
pub trait ReportSource {
    /// Run the project-wide collection step if `project` has not had it yet
    fn prepare(&mut self, project: &mut ProjectInfo) -> Result<(), ToolError>;

    /// Raw report text for one file
    fn report_for(&self, path: &Path) -> Result<String, ToolError>;
}

/// Run a command to completion and return its stdout
///
/// A non-zero exit becomes `ToolError::Failed` carrying stderr.
pub(crate) fn run_tool(tool: &str, mut command: Command) -> Result<String, ToolError> {
    debug!("Running {:?}", command);

    let output = command.output().map_err(|source| ToolError::Spawn {
        tool: tool.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| ToolError::InvalidOutput {
        tool: tool.to_string(),
    })
}
