//! Relational region store backed by SQLite.
//!
//! Four tables: `projects`, `files`, `regions` and `functions`. Containers
//! go to `regions` and reference their container through
//! `outer_region_id`; functions go to `functions`, keyed by the region that
//! contains them. Every insert hands back the generated row id.
//!
//! Functions are leaves of an exported tree, so a function row id is never
//! passed back in as a parent.

use super::records::ExportRecord;
use super::store::{RecordId, RegionStore};
use crate::parser::SourceFile;
use crate::project::ProjectInfo;
use crate::utils::error::StoreError;
use log::{debug, info};
use rusqlite::{params, Connection, Params};
use std::path::Path;

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS files (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES projects(id),
        path TEXT NOT NULL,
        language_name TEXT NOT NULL,
        cloc_blank_lines INTEGER NOT NULL,
        cloc_comment_lines INTEGER NOT NULL,
        cloc_code_lines INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS regions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_id INTEGER NOT NULL REFERENCES files(id),
        region_type TEXT NOT NULL,
        short_name TEXT NOT NULL,
        outer_region_id INTEGER REFERENCES regions(id),
        line_begin INTEGER NOT NULL,
        total_lines INTEGER NOT NULL,
        own_code_lines INTEGER NOT NULL,
        own_comment_lines INTEGER NOT NULL,
        code_lines INTEGER NOT NULL,
        comment_lines INTEGER NOT NULL,
        ccn_sum INTEGER NOT NULL,
        average_cyclomatic_complexity REAL NOT NULL,
        n_functions INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS functions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_id INTEGER NOT NULL REFERENCES files(id),
        region_id INTEGER REFERENCES regions(id),
        short_name TEXT NOT NULL,
        line_begin INTEGER NOT NULL,
        total_lines INTEGER NOT NULL,
        code_lines INTEGER NOT NULL,
        comment_lines INTEGER NOT NULL,
        cyclomatic_complexity INTEGER NOT NULL
    );
";

/// [`RegionStore`] writing into a SQLite database
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the tables exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("Opening metrics database {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for queries over stored rows
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn insert(&self, table: &str, sql: &str, params: impl Params) -> Result<RecordId, StoreError> {
        let id: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        debug!("Inserted {} row {}", table, id);
        // AUTOINCREMENT row ids start at 1
        Ok(id as RecordId)
    }
}

/// SQLite integers are signed; counts beyond `i64::MAX` are clamped
fn sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl RegionStore for SqliteStore {
    fn add_project(&mut self, project: &ProjectInfo) -> Result<RecordId, StoreError> {
        self.insert(
            "projects",
            "INSERT INTO projects(url, name) VALUES (?1, ?2) RETURNING id",
            params![project.url, project.name],
        )
    }

    fn add_file(&mut self, project_id: RecordId, file: &SourceFile) -> Result<RecordId, StoreError> {
        self.insert(
            "files",
            "INSERT INTO files(project_id, path, language_name,
                cloc_blank_lines, cloc_comment_lines, cloc_code_lines)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
            params![
                sql_int(project_id),
                file.path,
                file.language,
                sql_int(file.line_counts.blank),
                sql_int(file.line_counts.comment),
                sql_int(file.line_counts.code),
            ],
        )
    }

    fn add_region(
        &mut self,
        file_id: RecordId,
        record: &ExportRecord,
        parent_id: Option<RecordId>,
    ) -> Result<RecordId, StoreError> {
        let parent_id = parent_id.map(sql_int);

        if let Some(cyclomatic_complexity) = record.cyclomatic_complexity() {
            return self.insert(
                "functions",
                "INSERT INTO functions(file_id, region_id, short_name, line_begin, total_lines,
                    code_lines, comment_lines, cyclomatic_complexity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
                params![
                    sql_int(file_id),
                    parent_id,
                    record.name,
                    record.line_begin,
                    sql_int(record.total_lines),
                    sql_int(record.total_code_lines),
                    sql_int(record.total_comment_lines),
                    sql_int(cyclomatic_complexity),
                ],
            );
        }

        self.insert(
            "regions",
            "INSERT INTO regions(file_id, region_type, short_name, outer_region_id,
                line_begin, total_lines, own_code_lines, own_comment_lines,
                code_lines, comment_lines, ccn_sum, average_cyclomatic_complexity, n_functions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) RETURNING id",
            params![
                sql_int(file_id),
                record.kind.as_str(),
                record.name,
                parent_id,
                record.line_begin,
                sql_int(record.total_lines),
                sql_int(record.own_code_lines),
                sql_int(record.own_comment_lines),
                sql_int(record.total_code_lines),
                sql_int(record.total_comment_lines),
                sql_int(record.ccn_sum),
                record.average_cyclomatic_complexity().unwrap_or(0.0),
                sql_int(record.n_functions),
            ],
        )
    }
}
