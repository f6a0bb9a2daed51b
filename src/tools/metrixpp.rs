//! Raw report supplier backed by metrix++.
//!
//! metrix++ works in two steps: `collect` scans the whole project once into
//! a metrics database, then `view` renders the nested regions of one file
//! from that database.

use super::{run_tool, ReportSource};
use crate::project::ProjectInfo;
use crate::utils::config::MetrixppConfig;
use crate::utils::error::ToolError;
use log::info;
use std::path::Path;
use std::process::Command;

const TOOL_NAME: &str = "metrix++";

/// metrix++ invoked through a Python 2.7 interpreter
pub struct Metrixpp {
    config: MetrixppConfig,
}

impl Metrixpp {
    pub fn new(config: MetrixppConfig) -> Self {
        Self { config }
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut command = Command::new(&self.config.python);
        command
            .arg(&self.config.script)
            .arg(subcommand)
            .arg(format!("--db-file={}", self.config.db_file.display()))
            .arg("--log-level=WARNING");
        command
    }

    fn collect_command(&self, source_dir: &Path) -> Command {
        let mut command = self.command("collect");
        command
            .args([
                "--std.code.lines.total",
                "--std.code.lines.code",
                "--std.code.lines.preprocessor",
                "--std.code.lines.comments",
                "--std.code.complexity.cyclomatic",
            ])
            .arg("--")
            .arg(source_dir);
        command
    }

    fn view_command(&self, path: &Path) -> Command {
        let mut command = self.command("view");
        command
            .args(["--format=xml", "--nest-regions", "--"])
            .arg(path);
        command
    }
}

impl ReportSource for Metrixpp {
    fn prepare(&mut self, project: &mut ProjectInfo) -> Result<(), ToolError> {
        if project.metrics_collected {
            return Ok(());
        }

        info!("metrix++ collect started for {}", project.name);
        run_tool(TOOL_NAME, self.collect_command(&project.source_dir))?;
        project.metrics_collected = true;
        info!("metrix++ collect finished");
        Ok(())
    }

    fn report_for(&self, path: &Path) -> Result<String, ToolError> {
        let report = run_tool(TOOL_NAME, self.view_command(path))?;
        info!("metrix++ view finished for {}", path.display());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::PathBuf;

    fn metrixpp() -> Metrixpp {
        Metrixpp::new(MetrixppConfig {
            python: PathBuf::from("python2.7"),
            script: PathBuf::from("/opt/metrixpp/metrix++.py"),
            db_file: PathBuf::from("/tmp/metrixpp.db"),
        })
    }

    #[test]
    fn test_view_command_arguments() {
        let command = metrixpp().view_command(Path::new("gson/src/Gson.java"));
        let args: Vec<&OsStr> = command.get_args().collect();

        assert_eq!(command.get_program(), "python2.7");
        assert_eq!(
            args,
            vec![
                "/opt/metrixpp/metrix++.py",
                "view",
                "--db-file=/tmp/metrixpp.db",
                "--log-level=WARNING",
                "--format=xml",
                "--nest-regions",
                "--",
                "gson/src/Gson.java",
            ]
        );
    }

    #[test]
    fn test_collect_command_requests_line_and_complexity_metrics() {
        let command = metrixpp().collect_command(Path::new("gson"));
        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args[1], "collect");
        assert!(args.contains(&"--std.code.complexity.cyclomatic".to_string()));
        assert!(args.contains(&"--std.code.lines.preprocessor".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("gson"));
    }

    #[test]
    fn test_prepare_is_skipped_once_collected() {
        let mut project = ProjectInfo::new("gson", "gson");
        project.metrics_collected = true;
        // Would fail to spawn if it actually ran
        assert!(metrixpp().prepare(&mut project).is_ok());
    }
}
