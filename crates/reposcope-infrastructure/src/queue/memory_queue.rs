//! In-memory `JobQueue`, used for local/dev runs and tests. Concurrent
//! map mirrors the teacher's `dashmap` usage for the same kind of
//! shared, lock-free job registry.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use reposcope_domain::ports::{
    JobOutcome, JobQueue, JobState, JobStatusSnapshot, COMPLETED_RETENTION_MAX,
    COMPLETED_RETENTION_SECS, FAILED_RETENTION_SECS,
};
use reposcope_domain::value_objects::{AnalysisId, JobProgress};
use reposcope_domain::{Error, Result};

struct Entry {
    snapshot: JobStatusSnapshot,
    terminal_at: Option<chrono::DateTime<Utc>>,
}

/// Dashmap-backed [`JobQueue`] with retention pruning on each mutation,
/// suitable for single-process deployments.
#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: DashMap<AnalysisId, Entry>,
}

impl InMemoryJobQueue {
    /// Build an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn prune(&self) {
        let now = Utc::now();
        self.jobs.retain(|_, entry| match entry.snapshot.state {
            JobState::Completed => entry
                .terminal_at
                .is_some_and(|t| (now - t).num_seconds() < COMPLETED_RETENTION_SECS),
            JobState::Failed => entry
                .terminal_at
                .is_some_and(|t| (now - t).num_seconds() < FAILED_RETENTION_SECS),
            _ => true,
        });
        if self.jobs.len() > COMPLETED_RETENTION_MAX {
            let mut completed: Vec<(AnalysisId, chrono::DateTime<Utc>)> = self
                .jobs
                .iter()
                .filter(|e| matches!(e.snapshot.state, JobState::Completed))
                .filter_map(|e| e.terminal_at.map(|t| (*e.key(), t)))
                .collect();
            completed.sort_by_key(|(_, t)| *t);
            let overflow = completed.len().saturating_sub(COMPLETED_RETENTION_MAX);
            for (id, _) in completed.into_iter().take(overflow) {
                self.jobs.remove(&id);
            }
        }
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job_id: AnalysisId) -> Result<()> {
        if self.jobs.contains_key(&job_id) {
            return Err(Error::Conflict {
                message: format!("job {job_id} already queued"),
            });
        }
        self.jobs.insert(
            job_id,
            Entry {
                snapshot: JobStatusSnapshot {
                    state: JobState::Queued,
                    progress: Some(JobProgress::queued(6)),
                    failure_reason: None,
                    attempts: 0,
                },
                terminal_at: None,
            },
        );
        Ok(())
    }

    async fn status(&self, job_id: AnalysisId) -> Result<Option<JobStatusSnapshot>> {
        Ok(self.jobs.get(&job_id).map(|e| e.snapshot.clone()))
    }

    async fn cancel(&self, job_id: AnalysisId) -> Result<bool> {
        let Some(mut entry) = self.jobs.get_mut(&job_id) else {
            return Ok(false);
        };
        if !matches!(entry.snapshot.state, JobState::Queued) {
            return Ok(false);
        }
        entry.snapshot.state = JobState::Cancelled;
        entry.terminal_at = Some(Utc::now());
        Ok(true)
    }

    async fn update_progress(&self, job_id: AnalysisId, progress: JobProgress) -> Result<()> {
        if let Some(mut entry) = self.jobs.get_mut(&job_id) {
            entry.snapshot.state = JobState::Running;
            entry.snapshot.progress = Some(progress);
        }
        Ok(())
    }

    async fn complete(&self, job_id: AnalysisId, outcome: JobOutcome) -> Result<()> {
        if let Some(mut entry) = self.jobs.get_mut(&job_id) {
            entry.snapshot.attempts += 1;
            match outcome {
                JobOutcome::Success => {
                    entry.snapshot.state = JobState::Completed;
                    entry.snapshot.failure_reason = None;
                }
                JobOutcome::Failure(reason) => {
                    entry.snapshot.state = JobState::Failed;
                    entry.snapshot.failure_reason = Some(reason);
                }
            }
            entry.terminal_at = Some(Utc::now());
        }
        self.prune();
        Ok(())
    }

    async fn drain(&self) -> Result<()> {
        Ok(())
    }
}
