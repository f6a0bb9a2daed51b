//! Project checkouts for projects given by repository URL.

use super::run_tool;
use crate::utils::config::GitConfig;
use crate::utils::error::ToolError;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const TOOL_NAME: &str = "git";

/// A source tree being analyzed
///
/// A tree cloned by [`clone_repository`] is removed when the value is
/// dropped, unless it was asked to be kept.
#[derive(Debug)]
pub struct Checkout {
    path: PathBuf,
    remove_on_drop: bool,
}

impl Checkout {
    /// A tree that already existed; never removed
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            remove_on_drop: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.remove_on_drop
    }
}

impl Drop for Checkout {
    fn drop(&mut self) {
        if !self.remove_on_drop {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => info!("Removed checkout {}", self.path.display()),
            Err(e) => warn!("Could not remove checkout {}: {}", self.path.display(), e),
        }
    }
}

/// Clone `url` into `destination`
///
/// **Public** - used by the analyze command when no source tree is given
///
/// # Errors
/// * `ToolError::Spawn` - git cannot be started
/// * `ToolError::Failed` - the clone failed (bad URL, destination not empty, ...)
pub fn clone_repository(
    config: &GitConfig,
    url: &str,
    destination: &Path,
    keep: bool,
) -> Result<Checkout, ToolError> {
    info!("git clone {} into {}", url, destination.display());
    run_tool(TOOL_NAME, clone_command(config, url, destination))?;
    info!("git clone finished");

    Ok(Checkout {
        path: destination.to_path_buf(),
        remove_on_drop: !keep,
    })
}

fn clone_command(config: &GitConfig, url: &str, destination: &Path) -> Command {
    let mut command = Command::new(&config.path);
    command
        .args(["clone", "--quiet", "--", url])
        .arg(destination);
    command
}
