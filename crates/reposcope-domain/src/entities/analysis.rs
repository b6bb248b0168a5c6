//! The top-level unit of work: an analysis request and its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AnalysisId, AnalysisOptions};
use crate::Error;

/// Lifecycle state of an [`AnalysisRecord`].
///
/// Transitions follow a DAG: `Queued -> Processing -> (Completed | Failed |
/// Cancelled)`. Backwards transitions are rejected by
/// [`AnalysisRecord::transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Accepted, not yet picked up by a worker.
    Queued,
    /// A worker is actively running the pipeline.
    Processing,
    /// Pipeline finished successfully; artifacts are persisted.
    Completed,
    /// Pipeline exhausted its retries or hit an unrecoverable error.
    Failed,
    /// Cancelled while still queued.
    Cancelled,
}

impl AnalysisStatus {
    /// True once a record has reached a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    fn allows_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Processing)
                | (Self::Queued, Self::Cancelled)
                | (Self::Processing, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
                | (Self::Processing, Self::Cancelled)
        )
    }
}

/// Repository coordinates parsed out of the submitted URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCoordinates {
    /// Normalized repository URL.
    pub url: String,
    /// Owner / organization segment.
    pub owner: String,
    /// Repository name segment.
    pub name: String,
}

/// The top-level analysis unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Opaque, URL-safe, monotonic identifier.
    pub id: AnalysisId,
    /// Repository coordinates.
    pub repository: RepositoryCoordinates,
    /// Resolved branch; never empty once intake completes.
    pub branch: String,
    /// Resolved commit sha, absent until the fetch step completes.
    pub commit_sha: Option<String>,
    /// Current lifecycle state.
    pub status: AnalysisStatus,
    /// Options supplied (or defaulted) at intake.
    pub options: AnalysisOptions,
    /// Set iff `status == Failed`.
    pub error: Option<String>,
    /// Intake time.
    pub created_at: DateTime<Utc>,
    /// Set on first transition into `Processing`.
    pub started_at: Option<DateTime<Utc>>,
    /// Set on transition into `Completed` or `Failed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    /// Create a freshly queued record.
    #[must_use]
    pub fn new(repository: RepositoryCoordinates, branch: String, options: AnalysisOptions) -> Self {
        Self {
            id: AnalysisId::new(),
            repository,
            branch,
            commit_sha: None,
            status: AnalysisStatus::Queued,
            options,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Attempt a status transition, enforcing the lifecycle DAG and the
    /// `startedAt`/`completedAt` invariants.
    ///
    /// # Errors
    /// Returns [`Error::Internal`] if the transition is not allowed from
    /// the current state.
    pub fn transition_to(&mut self, next: AnalysisStatus) -> crate::Result<()> {
        if !self.status.allows_transition_to(next) {
            return Err(Error::internal(format!(
                "illegal status transition {:?} -> {:?}",
                self.status, next
            )));
        }
        let now = Utc::now();
        if matches!(next, AnalysisStatus::Processing) && self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.completed_at = Some(now);
        }
        self.status = next;
        Ok(())
    }

    /// Mark the record failed with the given message, enforcing the same
    /// transition rules as [`Self::transition_to`].
    ///
    /// # Errors
    /// Returns [`Error::Internal`] if the record is not currently
    /// `Processing`.
    pub fn fail(&mut self, message: impl Into<String>) -> crate::Result<()> {
        self.transition_to(AnalysisStatus::Failed)?;
        self.error = Some(message.into());
        Ok(())
    }
}
