//! Export of finished region trees.
//!
//! - Flat, ancestors-first records with the inside-function skip rule
//! - The store contract that assigns identifiers
//! - In-memory and SQLite stores

pub mod records;
pub mod sqlite;
pub mod store;

pub use records::{export_records, find_order_violations, ComplexitySummary, ExportRecord};
pub use sqlite::SqliteStore;
pub use store::{persist_file, MemoryStore, RecordId, RegionStore, StoredFile, StoredRegion};
