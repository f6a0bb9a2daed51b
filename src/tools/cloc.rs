//! Line-count supplier backed by cloc.

use super::run_tool;
use crate::utils::config::ClocConfig;
use crate::utils::error::ToolError;
use log::info;
use std::path::Path;
use std::process::Command;

/// Run `cloc --json --by-file` over a source tree
///
/// # Returns
/// Raw JSON text, ready for [`crate::parser::parse_line_counts`]
pub fn run_cloc(config: &ClocConfig, source_dir: &Path) -> Result<String, ToolError> {
    info!("cloc started for {}", source_dir.display());
    let json = run_tool("cloc", cloc_command(config, source_dir))?;
    info!("cloc finished");
    Ok(json)
}

fn cloc_command(config: &ClocConfig, source_dir: &Path) -> Command {
    let mut command = Command::new(&config.path);
    command.args(["--json", "--by-file"]).arg(source_dir);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloc_command_arguments() {
        let command = cloc_command(&ClocConfig::default(), Path::new("gson"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(command.get_program(), "cloc");
        assert_eq!(args, vec!["--json", "--by-file", "gson"]);
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let config = ClocConfig {
            path: "/nonexistent/cloc-binary".into(),
        };
        let err = run_cloc(&config, Path::new(".")).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
