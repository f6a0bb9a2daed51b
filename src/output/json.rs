//! JSON metrics report files.

use super::schema::MetricsReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a metrics report as pretty-printed JSON
///
/// **Public** - final step of the analyze and parse commands
///
/// Missing parent directories are created.
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path, a directory, or an uncreatable parent
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn write_report(report: &MetricsReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    super::validate_path(output_path)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("Creating report directory {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
    }

    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    info!(
        "Wrote {} files, {} regions to {}",
        report.files.len(),
        report.region_count(),
        output_path.display()
    );
    Ok(())
}

/// Load a metrics report written by [`write_report`]
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::ReadFailed` - the file cannot be opened
/// * `OutputError::InvalidReport` - the content is not a metrics report
pub fn read_report(input_path: impl AsRef<Path>) -> Result<MetricsReport, OutputError> {
    let path = input_path.as_ref();

    let file = File::open(path).map_err(|source| OutputError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let report: MetricsReport = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        OutputError::InvalidReport {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!(
        "Loaded report v{} for {} ({} files)",
        report.version,
        report.project.name,
        report.files.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectInfo;
    use tempfile::TempDir;

    fn empty_report() -> MetricsReport {
        MetricsReport {
            version: "1.0.0".to_string(),
            project: ProjectInfo::new("demo", "demo"),
            files: Vec::new(),
            generated_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let err = read_report(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, OutputError::ReadFailed { .. }));
    }

    #[test]
    fn test_foreign_json_is_invalid_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.json");
        fs::write(&path, r#"{"transaction_hash": "0x00"}"#).unwrap();

        let err = read_report(&path).unwrap_err();
        assert!(matches!(err, OutputError::InvalidReport { .. }));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("report.json");

        write_report(&empty_report(), &path).unwrap();
        assert_eq!(read_report(&path).unwrap().project.name, "demo");
    }

    #[test]
    fn test_directory_is_not_a_valid_output() {
        let dir = TempDir::new().unwrap();
        let err = write_report(&empty_report(), dir.path()).unwrap_err();
        assert!(matches!(err, OutputError::InvalidPath(_)));
    }
}
