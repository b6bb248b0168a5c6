//! Intake use case: validate a repository URL and options, queue a fresh
//! `AnalysisRecord`, and hand it to the job queue.

use chrono::{DateTime, Utc};
use reposcope_domain::entities::{AnalysisRecord, RepositoryCoordinates};
use reposcope_domain::value_objects::AnalysisId;
use reposcope_domain::value_objects::AnalysisOptions;
use reposcope_domain::Result;

use crate::services::Services;

/// Outcome of a successful intake, enough to build the `201` response.
#[derive(Debug, Clone)]
pub struct AnalysisAccepted {
    /// Newly assigned id.
    pub analysis_id: AnalysisId,
    /// Intake timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validates and queues a new analysis request (C2 validation + C1/C5
/// intake).
pub struct AnalyzeRepositoryUseCase {
    services: Services,
}

impl AnalyzeRepositoryUseCase {
    /// Build the use case over a `Services` record.
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Validate `repository_url`/`branch`/`options`, persist a queued
    /// record, and enqueue it.
    ///
    /// # Errors
    /// Returns [`reposcope_domain::Error::Validation`] if the URL or
    /// options fail validation, or any store/queue error encountered while
    /// persisting and enqueueing the record.
    pub async fn execute(
        &self,
        repository_url: &str,
        branch: Option<String>,
        options: Option<AnalysisOptions>,
    ) -> Result<AnalysisAccepted> {
        let parsed = self.services.remote_fetcher.validate_url(repository_url)?;
        let options = options.unwrap_or_default();
        options.validate()?;

        let record = AnalysisRecord::new(
            RepositoryCoordinates {
                url: parsed.normalized_url,
                owner: parsed.owner,
                name: parsed.name,
            },
            branch.unwrap_or_default(),
            options,
        );
        let analysis_id = record.id;
        let created_at = record.created_at;

        self.services.record_store.create(record).await?;
        self.services.job_queue.enqueue(analysis_id).await?;

        Ok(AnalysisAccepted {
            analysis_id,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fake_services;

    #[tokio::test]
    async fn rejects_urls_without_two_path_segments() {
        let use_case = AnalyzeRepositoryUseCase::new(fake_services());
        let result = use_case.execute("https://example.com/x", None, None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn accepts_valid_url_and_enqueues() {
        let use_case = AnalyzeRepositoryUseCase::new(fake_services());
        let result = use_case
            .execute("https://github.com/acme/widgets", None, None)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn rejects_out_of_range_options() {
        let use_case = AnalyzeRepositoryUseCase::new(fake_services());
        let options = AnalysisOptions {
            max_file_size_kb: 0,
            ..Default::default()
        };
        let result = use_case
            .execute("https://github.com/acme/widgets", None, Some(options))
            .await;
        assert!(result.is_err());
    }
}
