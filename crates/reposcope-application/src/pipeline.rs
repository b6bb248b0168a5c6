//! The worker: pulls a job and drives the fixed six-step pipeline with
//! progress reporting, modeled on the background-task shape of
//! `IndexingServiceImpl::run_indexing_task` - a plain async function
//! sequence over injected ports rather than an event-loop promise chain.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use reposcope_domain::constants::PIPELINE_STEPS;
use reposcope_domain::entities::AnalysisStatus;
use reposcope_domain::ports::{
    CloneOptions, JobOutcome, DEFAULT_PARSE_FILE_LIMIT, DEFAULT_PARSE_FILE_SIZE_CAP_BYTES,
};
use reposcope_domain::value_objects::{AnalysisId, FileTreeArtifact, JobProgress, Node};
use reposcope_domain::{Error, Result};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::services::Services;

/// Parse fan-out concurrency: bounded by available cores, matching the
/// async-everywhere model (no raw OS threads per request).
fn parse_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

/// Drives one analysis job through fetch -> clone -> walk -> parse ->
/// persist, reporting progress at each named step.
pub struct Worker {
    services: Services,
}

impl Worker {
    /// Build a worker over an already-constructed `Services` record.
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Run one job to completion, catching any pipeline error and, once
    /// `final_attempt` is set, recording it on the `AnalysisRecord` before
    /// re-raising it to the queue so the caller's attempt counter
    /// advances.
    ///
    /// `final_attempt` is set by [`crate::queue`]'s retry loop (see
    /// `reposcope-infrastructure`'s `JobRunner`) once it has exhausted its
    /// retry budget; before then the record is left `Processing` so the
    /// next attempt's opening status transition succeeds.
    ///
    /// # Errors
    /// Returns the pipeline's error. On the final attempt, that error is
    /// recorded as the job's failure first, per the spec's "store then
    /// rethrow" propagation policy.
    pub async fn run(&self, job_id: AnalysisId, final_attempt: bool) -> Result<()> {
        match self.run_pipeline(job_id).await {
            Ok(()) => {
                self.services
                    .job_queue
                    .complete(job_id, JobOutcome::Success)
                    .await?;
                Ok(())
            }
            Err(err) => {
                error!(job_id = %job_id, error = %err, final_attempt, "pipeline failed");
                if final_attempt {
                    if let Err(store_err) = self
                        .services
                        .record_store
                        .update_status(job_id, AnalysisStatus::Failed, Some(err.to_string()))
                        .await
                    {
                        warn!(job_id = %job_id, error = %store_err, "failed to record failure status");
                    }
                    self.services
                        .job_queue
                        .complete(job_id, JobOutcome::Failure(err.to_string()))
                        .await?;
                }
                Err(err)
            }
        }
    }

    async fn report(&self, job_id: AnalysisId, progress: &JobProgress) {
        if let Err(err) = self
            .services
            .job_queue
            .update_progress(job_id, progress.clone())
            .await
        {
            warn!(job_id = %job_id, error = %err, "failed to publish progress update");
        }
    }

    async fn run_pipeline(&self, job_id: AnalysisId) -> Result<()> {
        let with_artifacts = self
            .services
            .record_store
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("analysis {job_id} not found")))?;
        let record = with_artifacts.record;

        self.services
            .record_store
            .update_status(job_id, AnalysisStatus::Processing, None)
            .await?;

        let mut progress = JobProgress::queued(PIPELINE_STEPS.len() as u32);

        // Step 1: fetch repository metadata.
        progress = progress.advance(PIPELINE_STEPS[0].0, PIPELINE_STEPS[0].1);
        self.report(job_id, &progress).await;
        let metadata = self
            .services
            .remote_fetcher
            .fetch_metadata(&record.repository.owner, &record.repository.name)
            .await?;
        let branch = if record.branch.is_empty() {
            let resolved = metadata.default_branch;
            self.services
                .record_store
                .update_branch(job_id, resolved.clone())
                .await?;
            resolved
        } else {
            record.branch.clone()
        };

        // Step 2: clone.
        progress = progress.advance(PIPELINE_STEPS[1].0, PIPELINE_STEPS[1].1);
        self.report(job_id, &progress).await;
        let clone_options = CloneOptions {
            branch,
            ..CloneOptions::default()
        };
        let cloned = self
            .services
            .remote_fetcher
            .clone(&record.repository.url, clone_options)
            .await?;
        self.services
            .record_store
            .update_commit_sha(job_id, cloned.commit_sha.clone())
            .await?;

        // Every following step must dispose the working copy on both the
        // success and failure exit, never sharing it across jobs.
        let pipeline_result = self
            .run_remaining_steps(job_id, &cloned.local_path, &record.options, &mut progress)
            .await;

        if let Err(dispose_err) = self
            .services
            .remote_fetcher
            .dispose(&cloned.local_path)
            .await
        {
            warn!(job_id = %job_id, error = %dispose_err, "failed to dispose working copy");
        }

        pipeline_result?;

        self.services
            .record_store
            .update_status(job_id, AnalysisStatus::Completed, None)
            .await?;
        info!(job_id = %job_id, "analysis completed");
        Ok(())
    }

    async fn run_remaining_steps(
        &self,
        job_id: AnalysisId,
        working_copy: &Path,
        options: &reposcope_domain::value_objects::AnalysisOptions,
        progress: &mut JobProgress,
    ) -> Result<()> {
        // Step 3: build file tree.
        *progress = progress.advance(PIPELINE_STEPS[2].0, PIPELINE_STEPS[2].1);
        self.report(job_id, progress).await;
        let root = self
            .services
            .tree_walker
            .build_tree(working_copy, options)
            .await?;

        // Step 4: calculate metrics.
        *progress = progress.advance(PIPELINE_STEPS[3].0, PIPELINE_STEPS[3].1);
        self.report(job_id, progress).await;
        let statistics = self.services.tree_walker.statistics(&root);

        // Step 5: parse files. Always runs; `deepAnalysis` is accepted at
        // intake but not consumed here (see `AnalysisOptions::deep_analysis`).
        *progress = progress.advance(PIPELINE_STEPS[4].0, PIPELINE_STEPS[4].1);
        self.report(job_id, progress).await;
        let parsed_files = self.parse_files(working_copy, &root).await;

        // Step 6: persist.
        *progress = progress.advance(PIPELINE_STEPS[5].0, PIPELINE_STEPS[5].1);
        self.report(job_id, progress).await;
        self.services
            .record_store
            .save_file_tree(
                job_id,
                FileTreeArtifact {
                    root,
                    statistics,
                },
            )
            .await?;
        if !parsed_files.is_empty() {
            self.services
                .record_store
                .save_parsed_files(job_id, parsed_files)
                .await?;
        }

        *progress = progress.advance(
            "Analysis complete",
            reposcope_domain::constants::PIPELINE_COMPLETE_PERCENTAGE,
        );
        self.report(job_id, progress).await;
        Ok(())
    }

    async fn parse_files(
        &self,
        working_copy: &Path,
        root: &Node,
    ) -> Vec<reposcope_domain::entities::ParsedFile> {
        let mut candidates = Vec::new();
        collect_parseable(root, &self.services, &mut candidates);

        // Bound the number of files parsed per job; largest files are
        // dropped first when over the limit.
        candidates.sort_by_key(|(_, size)| *size);
        candidates.truncate(DEFAULT_PARSE_FILE_LIMIT);

        let semaphore = Arc::new(Semaphore::new(parse_concurrency()));
        let parser = Arc::clone(&self.services.source_parser);
        let tasks = candidates.into_iter().map(|(path, size)| {
            let semaphore = Arc::clone(&semaphore);
            let parser = Arc::clone(&parser);
            let working_copy = working_copy.to_path_buf();
            async move {
                let _permit = semaphore.acquire().await.ok()?;
                if size > DEFAULT_PARSE_FILE_SIZE_CAP_BYTES {
                    return None;
                }
                let absolute = working_copy.join(&path);
                let content = tokio::fs::read_to_string(&absolute).await.ok()?;
                let detection = parser.detect(Path::new(&path), Some(content.as_bytes()));
                parser.parse(&path, &detection.language, &content)
            }
        });

        join_all(tasks).await.into_iter().flatten().collect()
    }
}

fn collect_parseable(node: &Node, services: &Services, out: &mut Vec<(String, u64)>) {
    match node {
        Node::Directory { children, .. } => {
            for child in children {
                collect_parseable(child, services, out);
            }
        }
        Node::File { path, metadata, .. } => {
            if services.source_parser.is_parseable(&metadata.language) {
                out.push((path.clone(), metadata.size));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fake_services;
    use crate::use_cases::analyze_repository::AnalyzeRepositoryUseCase;
    use reposcope_domain::ports::RecordStore;

    #[tokio::test]
    async fn successful_job_reaches_completed_with_empty_tree() {
        let services = fake_services();
        let analyze = AnalyzeRepositoryUseCase::new(services.clone());
        let accepted = analyze
            .execute("https://github.com/acme/widgets", None, None)
            .await
            .unwrap();

        let worker = Worker::new(services.clone());
        worker.run(accepted.analysis_id, true).await.unwrap();

        let stored = services
            .record_store
            .find_by_id(accepted.analysis_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.record.status, AnalysisStatus::Completed);
        assert!(stored.file_tree.is_some());
    }

    #[tokio::test]
    async fn unknown_job_id_fails_without_panicking() {
        let worker = Worker::new(fake_services());
        assert!(worker.run(AnalysisId::new(), true).await.is_err());
    }

    struct AlwaysFailsFetcher;

    #[async_trait::async_trait]
    impl reposcope_domain::ports::RemoteFetcher for AlwaysFailsFetcher {
        fn validate_url(
            &self,
            url: &str,
        ) -> Result<reposcope_domain::ports::ParsedRepositoryUrl> {
            let (owner, name) = reposcope_domain::utils::parse_owner_repo(url)
                .ok_or_else(|| Error::validation(format!("invalid repository url: {url}")))?;
            Ok(reposcope_domain::ports::ParsedRepositoryUrl {
                owner,
                name,
                normalized_url: url.to_owned(),
            })
        }

        async fn fetch_metadata(
            &self,
            _owner: &str,
            _name: &str,
        ) -> Result<reposcope_domain::ports::RepositoryMetadata> {
            Err(Error::ServiceUnavailable {
                message: "upstream unreachable".to_owned(),
            })
        }

        async fn resolve_commit(&self, _owner: &str, _name: &str, _branch: &str) -> Result<String> {
            unreachable!("fetch_metadata fails first")
        }

        async fn clone(
            &self,
            _url: &str,
            _options: CloneOptions,
        ) -> Result<reposcope_domain::ports::ClonedRepository> {
            unreachable!("fetch_metadata fails first")
        }

        async fn dispose(&self, _local_path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn non_final_attempt_leaves_record_processing_not_failed() {
        let mut services = fake_services();
        services.remote_fetcher = Arc::new(AlwaysFailsFetcher);
        let analyze = AnalyzeRepositoryUseCase::new(services.clone());
        let accepted = analyze
            .execute("https://github.com/acme/widgets", None, None)
            .await
            .unwrap();

        let worker = Worker::new(services.clone());
        assert!(worker.run(accepted.analysis_id, false).await.is_err());

        let stored = services
            .record_store
            .find_by_id(accepted.analysis_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.record.status, AnalysisStatus::Processing);
        assert!(stored.record.error.is_none());

        // A subsequent attempt must be able to re-enter `Processing`
        // rather than fail on an illegal transition from a prior attempt.
        assert!(worker.run(accepted.analysis_id, true).await.is_err());
        let stored = services
            .record_store
            .find_by_id(accepted.analysis_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.record.status, AnalysisStatus::Failed);
        assert!(stored.record.error.is_some());
    }
}
