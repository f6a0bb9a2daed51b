//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Structural errors while reading a nested-region report.
///
/// Fatal to the single file being parsed; the caller decides whether to
/// skip the file or abort the run.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("report is not well-formed XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("missing <{element}> element in {context}")]
    MissingElement {
        element: &'static str,
        context: String,
    },

    #[error("missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidNumber {
        element: String,
        attribute: &'static str,
        value: String,
    },
}

/// Errors that can occur while reading line-counter output
#[derive(Error, Debug)]
pub enum LineCountError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid line count format: {0}")]
    InvalidFormat(String),
}

/// Errors raised by the external tool suppliers
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {status}: {stderr}")]
    Failed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("{tool} produced non UTF-8 output")]
    InvalidOutput { tool: String },
}

/// Errors raised by a region store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record {index} references parent {parent} which has no identifier yet")]
    ParentNotPersisted { index: usize, parent: usize },

    #[error("unknown file id {0}")]
    UnknownFile(u64),

    #[error("unknown region id {0}")]
    UnknownRegion(u64),

    #[error("unknown project id {0}")]
    UnknownProject(u64),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Failed to read report {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report {path} is not a valid metrics report: {source}")]
    InvalidReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while loading the tools configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    ParseFailed(#[from] toml::de::Error),
}
