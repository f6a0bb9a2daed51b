//! Per-file line counts from `cloc --json --by-file`.
//!
//! The document is an object keyed by file path, plus two bookkeeping
//! entries (`header` and `SUM`) that are not files.

use crate::utils::error::LineCountError;
use log::debug;
use serde::{Deserialize, Serialize};

const BOOKKEEPING_KEYS: &[&str] = &["header", "SUM"];

/// Blank/comment/code counts for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub blank: u64,
    pub comment: u64,
    pub code: u64,
}

/// A source file reported by the line counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub language: String,
    pub line_counts: LineCounts,
}

#[derive(Deserialize)]
struct ClocEntry {
    language: String,
    blank: u64,
    comment: u64,
    code: u64,
}

/// Parse the line counter's per-file JSON output
///
/// **Public** - input of the batch driver
///
/// # Returns
/// Source files sorted by path
///
/// # Errors
/// * `LineCountError::JsonError` - Invalid JSON
/// * `LineCountError::InvalidFormat` - Not an object, or an entry lacks a field
pub fn parse_line_counts(json: &str) -> Result<Vec<SourceFile>, LineCountError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(entries) = value else {
        return Err(LineCountError::InvalidFormat(
            "line counts must be a JSON object keyed by file path".to_string(),
        ));
    };

    let mut files = Vec::with_capacity(entries.len());
    for (path, entry) in entries {
        if BOOKKEEPING_KEYS.contains(&path.as_str()) {
            continue;
        }
        let entry: ClocEntry = serde_json::from_value(entry)
            .map_err(|e| LineCountError::InvalidFormat(format!("entry for {}: {}", path, e)))?;
        files.push(SourceFile {
            path,
            language: entry.language,
            line_counts: LineCounts {
                blank: entry.blank,
                comment: entry.comment,
                code: entry.code,
            },
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("Read line counts for {} files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_skips_bookkeeping_entries() {
        let json = r#"{
            "header": {"cloc_version": "1.72", "n_files": 2},
            "gson/src/B.java": {"blank": 4, "comment": 10, "code": 50, "language": "Java"},
            "gson/src/A.java": {"blank": 1, "comment": 2, "code": 3, "language": "Java"},
            "SUM": {"blank": 5, "comment": 12, "code": 53, "nFiles": 2}
        }"#;

        let files = parse_line_counts(json).unwrap();

        assert_eq!(
            files,
            vec![
                SourceFile {
                    path: "gson/src/A.java".to_string(),
                    language: "Java".to_string(),
                    line_counts: LineCounts { blank: 1, comment: 2, code: 3 },
                },
                SourceFile {
                    path: "gson/src/B.java".to_string(),
                    language: "Java".to_string(),
                    line_counts: LineCounts { blank: 4, comment: 10, code: 50 },
                },
            ]
        );
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            parse_line_counts("[]"),
            Err(LineCountError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_incomplete_entry() {
        let json = r#"{"a.c": {"blank": 1, "language": "C"}}"#;
        assert!(matches!(
            parse_line_counts(json),
            Err(LineCountError::InvalidFormat(_))
        ));
    }
}
