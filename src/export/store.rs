//! Persistence of export records.
//!
//! A [`RegionStore`] hands out an identifier for every row it accepts.
//! Regions reference their container by that identifier, which is why
//! records must be persisted ancestors-first.

use super::records::ExportRecord;
use crate::parser::SourceFile;
use crate::project::ProjectInfo;
use crate::utils::error::StoreError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Identifier generated by a store
pub type RecordId = u64;

/// Destination for projects, files and regions
pub trait RegionStore {
    fn add_project(&mut self, project: &ProjectInfo) -> Result<RecordId, StoreError>;

    fn add_file(&mut self, project_id: RecordId, file: &SourceFile) -> Result<RecordId, StoreError>;

    /// Insert one region; `parent_id` is the identifier of its container
    fn add_region(
        &mut self,
        file_id: RecordId,
        record: &ExportRecord,
        parent_id: Option<RecordId>,
    ) -> Result<RecordId, StoreError>;
}

/// Persist one file's export records in order
///
/// **Public** - bridge between the export adapter and a store
///
/// # Returns
/// The identifier of each record, index for index
///
/// # Errors
/// * `StoreError::ParentNotPersisted` - a record precedes its parent
/// * anything the store reports
pub fn persist_file<S: RegionStore + ?Sized>(
    store: &mut S,
    file_id: RecordId,
    records: &[ExportRecord],
) -> Result<Vec<RecordId>, StoreError> {
    let mut ids: Vec<RecordId> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let parent_id = record
            .parent
            .map(|parent| {
                ids.get(parent)
                    .copied()
                    .ok_or(StoreError::ParentNotPersisted { index, parent })
            })
            .transpose()?;
        ids.push(store.add_region(file_id, record, parent_id)?);
    }

    debug!("Persisted {} regions for file {}", ids.len(), file_id);
    Ok(ids)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProject {
    pub id: RecordId,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: RecordId,
    pub project_id: RecordId,
    #[serde(flatten)]
    pub file: SourceFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRegion {
    pub id: RecordId,
    pub file_id: RecordId,
    pub parent_id: Option<RecordId>,
    #[serde(flatten)]
    pub record: ExportRecord,
}

/// In-memory store with sequential identifiers starting at 1
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: Vec<StoredProject>,
    files: Vec<StoredFile>,
    regions: Vec<StoredRegion>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[StoredProject] {
        &self.projects
    }

    pub fn files(&self) -> &[StoredFile] {
        &self.files
    }

    pub fn regions_for_file(&self, file_id: RecordId) -> impl Iterator<Item = &StoredRegion> + '_ {
        self.regions.iter().filter(move |r| r.file_id == file_id)
    }

    fn next_id(len: usize) -> RecordId {
        len as RecordId + 1
    }
}

impl RegionStore for MemoryStore {
    fn add_project(&mut self, project: &ProjectInfo) -> Result<RecordId, StoreError> {
        let id = Self::next_id(self.projects.len());
        self.projects.push(StoredProject {
            id,
            name: project.name.clone(),
            url: project.url.clone(),
        });
        Ok(id)
    }

    fn add_file(&mut self, project_id: RecordId, file: &SourceFile) -> Result<RecordId, StoreError> {
        if !self.projects.iter().any(|p| p.id == project_id) {
            return Err(StoreError::UnknownProject(project_id));
        }
        let id = Self::next_id(self.files.len());
        self.files.push(StoredFile {
            id,
            project_id,
            file: file.clone(),
        });
        Ok(id)
    }

    fn add_region(
        &mut self,
        file_id: RecordId,
        record: &ExportRecord,
        parent_id: Option<RecordId>,
    ) -> Result<RecordId, StoreError> {
        if !self.files.iter().any(|f| f.id == file_id) {
            return Err(StoreError::UnknownFile(file_id));
        }
        if let Some(parent_id) = parent_id {
            if !self.regions.iter().any(|r| r.id == parent_id) {
                return Err(StoreError::UnknownRegion(parent_id));
            }
        }
        let id = Self::next_id(self.regions.len());
        self.regions.push(StoredRegion {
            id,
            file_id,
            parent_id,
            record: record.clone(),
        });
        Ok(id)
    }
}
