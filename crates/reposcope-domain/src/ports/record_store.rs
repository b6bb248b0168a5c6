//! Port for persisting analyses, file trees and parsed files (C5).

use async_trait::async_trait;

use crate::entities::{AnalysisRecord, AnalysisStatus, ParsedFile};
use crate::value_objects::{AnalysisId, FileTreeArtifact};
use crate::Result;

/// A page of [`AnalysisRecord`]s plus the total matching count.
#[derive(Debug, Clone)]
pub struct AnalysisPage {
    /// Records in this page, newest first.
    pub records: Vec<AnalysisRecord>,
    /// Total number of matching records, independent of pagination.
    pub total: u64,
}

/// Filter/pagination parameters for [`RecordStore::list`].
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Maximum records to return, in `[1, 100]`.
    pub limit: u32,
    /// Number of records to skip.
    pub offset: u32,
    /// Optional status filter.
    pub status: Option<AnalysisStatus>,
}

/// An `AnalysisRecord` together with its (possibly absent) artifacts.
#[derive(Debug, Clone)]
pub struct AnalysisWithArtifacts {
    /// The record itself.
    pub record: AnalysisRecord,
    /// The file tree, present only once the record reached `Completed`.
    pub file_tree: Option<FileTreeArtifact>,
    /// Parsed files, empty until the worker's persist step runs.
    pub parsed_files: Vec<ParsedFile>,
}

/// Persists `AnalysisRecord`, `FileTreeArtifact` and `ParsedFile` rows
/// (C5).
///
/// All writes on one job's behalf are serializable with concurrent reads:
/// a reader observing `status == Completed` must also observe the
/// corresponding `FileTreeArtifact` (no torn reads).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a freshly queued record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Conflict`] if `record.id` already exists.
    async fn create(&self, record: AnalysisRecord) -> Result<()>;

    /// Fetch a record together with its artifacts, if any.
    async fn find_by_id(&self, id: AnalysisId) -> Result<Option<AnalysisWithArtifacts>>;

    /// Atomically transition a record's status, setting `startedAt`/
    /// `completedAt` per the entity's own invariants.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if `id` is unknown.
    async fn update_status(
        &self,
        id: AnalysisId,
        status: AnalysisStatus,
        error: Option<String>,
    ) -> Result<()>;

    /// Record the resolved commit sha for a record.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if `id` is unknown.
    async fn update_commit_sha(&self, id: AnalysisId, sha: String) -> Result<()>;

    /// Record the branch resolved from the remote's default branch, for
    /// intakes that did not supply one explicitly.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if `id` is unknown.
    async fn update_branch(&self, id: AnalysisId, branch: String) -> Result<()>;

    /// List records, newest first, ties broken by id.
    async fn list(&self, query: ListQuery) -> Result<AnalysisPage>;

    /// Delete a record and cascade to its artifacts.
    ///
    /// Idempotent: deleting an unknown id returns `Ok(false)` rather than
    /// an error, so the HTTP boundary can map that to 404 without a
    /// separate existence check.
    async fn delete(&self, id: AnalysisId) -> Result<bool>;

    /// Persist the file tree and its statistics for `id`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if `id` is unknown.
    async fn save_file_tree(&self, id: AnalysisId, tree: FileTreeArtifact) -> Result<()>;

    /// Persist a batch of parsed files, idempotent on `(id, path)`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if `id` is unknown.
    async fn save_parsed_files(&self, id: AnalysisId, files: Vec<ParsedFile>) -> Result<()>;
}
