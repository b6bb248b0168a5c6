//! Drives a queued job to completion, retrying failed attempts with
//! exponential backoff, mirroring `mcb-application`'s fire-and-forget
//! `tokio::spawn` submission pattern in
//! `IndexingServiceImpl::run_indexing_task` plus the spec's `4.1`
//! attempt/backoff contract.

use std::sync::Arc;

use reposcope_application::Worker;
use reposcope_domain::ports::{DEFAULT_MAX_ATTEMPTS, RETRY_BASE_DELAY_MS};
use reposcope_domain::value_objects::AnalysisId;
use tracing::{info, warn};

/// Spawns a background task per job that retries the pipeline up to
/// [`DEFAULT_MAX_ATTEMPTS`] times with exponential backoff starting at
/// [`RETRY_BASE_DELAY_MS`].
#[derive(Clone)]
pub struct JobRunner {
    worker: Arc<Worker>,
}

impl JobRunner {
    /// Build a runner over a worker.
    #[must_use]
    pub fn new(worker: Arc<Worker>) -> Self {
        Self { worker }
    }

    /// Spawn the job on the tokio runtime; returns immediately.
    pub fn spawn(&self, job_id: AnalysisId) {
        let runner = self.clone();
        tokio::spawn(async move { runner.run_with_retries(job_id).await });
    }

    async fn run_with_retries(&self, job_id: AnalysisId) {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let final_attempt = attempt >= DEFAULT_MAX_ATTEMPTS;
            match self.worker.run(job_id, final_attempt).await {
                Ok(()) => {
                    info!(job_id = %job_id, attempt, "job completed");
                    return;
                }
                Err(err) => {
                    if final_attempt {
                        warn!(job_id = %job_id, attempt, error = %err, "job failed permanently");
                        return;
                    }
                    let backoff = RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 1);
                    warn!(job_id = %job_id, attempt, error = %err, backoff_ms = backoff, "retrying after backoff");
                    tokio::time::sleep(std::time::Duration::from_millis(backoff)).await;
                }
            }
        }
    }
}
