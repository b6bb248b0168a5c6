//! Read-side and lifecycle use cases over an already-queued analysis:
//! status, tree, list, and delete.

use reposcope_domain::entities::{AnalysisRecord, AnalysisStatus};
use reposcope_domain::ports::{AnalysisPage, ListQuery};
use reposcope_domain::value_objects::{AnalysisId, FileTreeArtifact, JobProgress};
use reposcope_domain::{Error, Result};

use crate::services::Services;

/// Combined view returned by [`QueryAnalysisUseCase::status`].
#[derive(Debug, Clone)]
pub struct AnalysisStatusView {
    /// The record itself.
    pub record: AnalysisRecord,
    /// Latest queue-level progress, if the job has started.
    pub progress: Option<JobProgress>,
}

/// Read-side and administrative operations over analyses (C1 status +
/// C5 queries/delete).
pub struct QueryAnalysisUseCase {
    services: Services,
}

impl QueryAnalysisUseCase {
    /// Build the use case over a `Services` record.
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Combine the record's persisted status with the queue's live
    /// progress, for `GET /analysis/:id/status`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if `id` is unknown.
    pub async fn status(&self, id: AnalysisId) -> Result<AnalysisStatusView> {
        let with_artifacts = self
            .services
            .record_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        let progress = self
            .services
            .job_queue
            .status(id)
            .await?
            .and_then(|snapshot| snapshot.progress);
        Ok(AnalysisStatusView {
            record: with_artifacts.record,
            progress,
        })
    }

    /// Fetch the completed file-tree artifact, for `GET
    /// /analysis/:id/tree`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the analysis is unknown or has not
    /// yet produced a tree.
    pub async fn tree(&self, id: AnalysisId) -> Result<FileTreeArtifact> {
        let with_artifacts = self
            .services
            .record_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        with_artifacts
            .file_tree
            .ok_or_else(|| Error::not_found(format!("no file tree for analysis {id}")))
    }

    /// Paginated listing, newest first, for `GET /analyses`.
    ///
    /// # Errors
    /// Propagates whatever the backing store returns.
    pub async fn list(
        &self,
        limit: u32,
        offset: u32,
        status: Option<AnalysisStatus>,
    ) -> Result<AnalysisPage> {
        self.services
            .record_store
            .list(ListQuery {
                limit,
                offset,
                status,
            })
            .await
    }

    /// Delete an analysis and cascade to its artifacts, for `DELETE
    /// /analysis/:id`. Idempotent: deleting an unknown id returns `Ok(false)`
    /// rather than an error.
    ///
    /// # Errors
    /// Propagates whatever the backing store returns.
    pub async fn delete(&self, id: AnalysisId) -> Result<bool> {
        self.services.record_store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fake_services;
    use crate::use_cases::analyze_repository::AnalyzeRepositoryUseCase;

    #[tokio::test]
    async fn status_of_unknown_id_is_not_found() {
        let use_case = QueryAnalysisUseCase::new(fake_services());
        let result = use_case.status(AnalysisId::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn status_reflects_freshly_queued_record() {
        let services = fake_services();
        let analyze = AnalyzeRepositoryUseCase::new(services.clone());
        let accepted = analyze
            .execute("https://github.com/acme/widgets", None, None)
            .await
            .unwrap();

        let query = QueryAnalysisUseCase::new(services);
        let view = query.status(accepted.analysis_id).await.unwrap();
        assert_eq!(view.record.status, AnalysisStatus::Queued);
    }

    #[tokio::test]
    async fn tree_is_not_found_before_completion() {
        let services = fake_services();
        let analyze = AnalyzeRepositoryUseCase::new(services.clone());
        let accepted = analyze
            .execute("https://github.com/acme/widgets", None, None)
            .await
            .unwrap();

        let query = QueryAnalysisUseCase::new(services);
        assert!(query.tree(accepted.analysis_id).await.is_err());
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_idempotent() {
        let query = QueryAnalysisUseCase::new(fake_services());
        let deleted = query.delete(AnalysisId::new()).await.unwrap();
        assert!(!deleted);
    }
}
