//! Redis-backed `JobQueue`, the teacher's queue backend (`redis` with
//! `tokio-comp`/`connection-manager` features).

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use reposcope_domain::ports::{JobOutcome, JobQueue, JobState, JobStatusSnapshot};
use reposcope_domain::value_objects::{AnalysisId, JobProgress};
use reposcope_domain::{Error, Result};

fn key(job_id: AnalysisId) -> String {
    format!("reposcope:job:{job_id}")
}

/// Queue backed by a shared Redis connection manager. One string key per
/// job, holding its JSON-serialized [`JobStatusSnapshot`]; expiry is left
/// to Redis `EXPIRE` rather than app-level pruning.
#[derive(Clone)]
pub struct RedisJobQueue {
    connection: ConnectionManager,
}

impl RedisJobQueue {
    /// Connect to `redis_url` (e.g. `redis://host:port`).
    ///
    /// # Errors
    /// Returns [`Error::ServiceUnavailable`] if Redis cannot be reached.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|err| Error::service_unavailable(format!("invalid redis url: {err}")))?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(|err| Error::service_unavailable(format!("redis connect failed: {err}")))?;
        Ok(Self { connection })
    }

    async fn write(&self, job_id: AnalysisId, snapshot: &JobStatusSnapshot) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        let mut conn = self.connection.clone();
        let retention = match snapshot.state {
            JobState::Completed => Some(reposcope_domain::ports::COMPLETED_RETENTION_SECS),
            JobState::Failed => Some(reposcope_domain::ports::FAILED_RETENTION_SECS),
            _ => None,
        };
        if let Some(ttl) = retention {
            let _: () = conn
                .set_ex(key(job_id), payload, ttl.max(1) as u64)
                .await
                .map_err(|err| Error::service_unavailable(format!("redis write failed: {err}")))?;
        } else {
            let _: () = conn
                .set(key(job_id), payload)
                .await
                .map_err(|err| Error::service_unavailable(format!("redis write failed: {err}")))?;
        }
        Ok(())
    }

    async fn read(&self, job_id: AnalysisId) -> Result<Option<JobStatusSnapshot>> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn
            .get(key(job_id))
            .await
            .map_err(|err| Error::service_unavailable(format!("redis read failed: {err}")))?;
        raw.map(|s| serde_json::from_str(&s).map_err(Error::from))
            .transpose()
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, job_id: AnalysisId) -> Result<()> {
        if self.read(job_id).await?.is_some() {
            return Err(Error::Conflict {
                message: format!("job {job_id} already queued"),
            });
        }
        self.write(
            job_id,
            &JobStatusSnapshot {
                state: JobState::Queued,
                progress: Some(JobProgress::queued(6)),
                failure_reason: None,
                attempts: 0,
            },
        )
        .await
    }

    async fn status(&self, job_id: AnalysisId) -> Result<Option<JobStatusSnapshot>> {
        self.read(job_id).await
    }

    async fn cancel(&self, job_id: AnalysisId) -> Result<bool> {
        let Some(mut snapshot) = self.read(job_id).await? else {
            return Ok(false);
        };
        if !matches!(snapshot.state, JobState::Queued) {
            return Ok(false);
        }
        snapshot.state = JobState::Cancelled;
        self.write(job_id, &snapshot).await?;
        Ok(true)
    }

    async fn update_progress(&self, job_id: AnalysisId, progress: JobProgress) -> Result<()> {
        let Some(mut snapshot) = self.read(job_id).await? else {
            return Ok(());
        };
        snapshot.state = JobState::Running;
        snapshot.progress = Some(progress);
        self.write(job_id, &snapshot).await
    }

    async fn complete(&self, job_id: AnalysisId, outcome: JobOutcome) -> Result<()> {
        let Some(mut snapshot) = self.read(job_id).await? else {
            return Ok(());
        };
        snapshot.attempts += 1;
        match outcome {
            JobOutcome::Success => {
                snapshot.state = JobState::Completed;
                snapshot.failure_reason = None;
            }
            JobOutcome::Failure(reason) => {
                snapshot.state = JobState::Failed;
                snapshot.failure_reason = Some(reason);
            }
        }
        self.write(job_id, &snapshot).await
    }

    async fn drain(&self) -> Result<()> {
        Ok(())
    }
}
