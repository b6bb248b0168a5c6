//! Port for the durable job queue (C1).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::value_objects::{AnalysisId, JobProgress};
use crate::Result;

/// Default worker pool size (`QUEUE_CONCURRENCY`).
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default number of attempts before a job is marked permanently failed.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential retry backoff.
pub const RETRY_BASE_DELAY_MS: u64 = 2_000;

/// How long completed job records are retained.
pub const COMPLETED_RETENTION_SECS: i64 = 60 * 60;

/// Maximum number of completed job records retained at once.
pub const COMPLETED_RETENTION_MAX: usize = 100;

/// How long failed job records are retained.
pub const FAILED_RETENTION_SECS: i64 = 24 * 60 * 60;

/// Lifecycle state of a queued job, independent of the `AnalysisRecord`
/// it drives (the queue may retry a job several times before the analysis
/// itself reaches a terminal state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Waiting for a free worker slot.
    Queued,
    /// A worker has picked it up and is running the pipeline.
    Running,
    /// The pipeline finished successfully.
    Completed,
    /// All attempts exhausted.
    Failed,
    /// Removed from the queue before it started running.
    Cancelled,
}

/// A point-in-time view of a job's queue state, returned by
/// [`JobQueue::status`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusSnapshot {
    /// Current queue-level state.
    pub state: JobState,
    /// Latest progress record, if the job has started.
    pub progress: Option<JobProgress>,
    /// Set when `state == Failed`: the last attempt's error message.
    pub failure_reason: Option<String>,
    /// Attempts made so far.
    pub attempts: u32,
}

/// Outcome reported by the worker when a job finishes one attempt.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// The pipeline completed successfully.
    Success,
    /// The pipeline failed with the given message; the queue decides
    /// whether to retry based on `attempts`/`max_attempts`.
    Failure(String),
}

/// Durable FIFO queue of analysis jobs, with retry/backoff and an opaque
/// progress channel (C1).
///
/// Implementations must provide at-least-once delivery: a worker crash
/// mid-job causes the job to be rescheduled until attempts are exhausted.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Place a job keyed by `job_id`. Duplicate enqueues for an id already
    /// present are rejected with [`crate::Error::Conflict`].
    async fn enqueue(&self, job_id: AnalysisId) -> Result<()>;

    /// Look up the current state of a job, if known.
    async fn status(&self, job_id: AnalysisId) -> Result<Option<JobStatusSnapshot>>;

    /// Remove a job that has not yet started running. Returns `false` if
    /// the job is unknown or already running/terminal.
    async fn cancel(&self, job_id: AnalysisId) -> Result<bool>;

    /// Record a progress update for the in-flight attempt. Failures to
    /// publish are non-fatal to the caller; implementations should log and
    /// swallow transport errors rather than propagate them.
    async fn update_progress(&self, job_id: AnalysisId, progress: JobProgress) -> Result<()>;

    /// Record the terminal outcome of one attempt. On [`JobOutcome::
    /// Failure`], the queue decides whether to retry (attempts remaining)
    /// or mark the job permanently failed.
    async fn complete(&self, job_id: AnalysisId, outcome: JobOutcome) -> Result<()>;

    /// Close the queue for graceful shutdown: stop accepting new jobs and
    /// let in-flight jobs finish.
    async fn drain(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants_match_spec() {
        assert_eq!(DEFAULT_CONCURRENCY, 5);
        assert_eq!(DEFAULT_MAX_ATTEMPTS, 3);
        assert_eq!(RETRY_BASE_DELAY_MS, 2_000);
        assert_eq!(COMPLETED_RETENTION_MAX, 100);
    }
}
