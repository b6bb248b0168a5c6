//! In-memory fakes for the application layer's own unit tests. The real
//! adapters live in `reposcope-infrastructure`, which depends on this
//! crate (not the other way around), so these fakes exist to let use-case
//! and pipeline tests run without that dependency.

#![cfg(test)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use reposcope_domain::entities::{AnalysisRecord, AnalysisStatus, ParsedFile};
use reposcope_domain::ports::{
    AnalysisPage, AnalysisWithArtifacts, ClonedRepository, CloneOptions, DetectionBasis,
    DetectionResult, JobOutcome, JobQueue, JobState, JobStatusSnapshot, ListQuery,
    ParsedRepositoryUrl, RecordStore, RemoteFetcher, RepositoryMetadata, SourceParser, TreeWalker,
    Confidence,
};
use reposcope_domain::value_objects::{
    AnalysisId, AnalysisOptions, FileTreeArtifact, FileTreeStatistics, JobProgress, Node, NodeId,
};
use reposcope_domain::{Error, Result};

use crate::services::Services;

#[derive(Default)]
pub struct FakeJobQueue {
    jobs: Mutex<HashMap<AnalysisId, JobStatusSnapshot>>,
}

#[async_trait]
impl JobQueue for FakeJobQueue {
    async fn enqueue(&self, job_id: AnalysisId) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        if jobs.contains_key(&job_id) {
            return Err(Error::Conflict {
                message: format!("job {job_id} already queued"),
            });
        }
        jobs.insert(
            job_id,
            JobStatusSnapshot {
                state: JobState::Queued,
                progress: Some(JobProgress::queued(6)),
                failure_reason: None,
                attempts: 0,
            },
        );
        Ok(())
    }

    async fn status(&self, job_id: AnalysisId) -> Result<Option<JobStatusSnapshot>> {
        let jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(jobs.get(&job_id).map(|s| JobStatusSnapshot {
            state: s.state,
            progress: s.progress.clone(),
            failure_reason: s.failure_reason.clone(),
            attempts: s.attempts,
        }))
    }

    async fn cancel(&self, job_id: AnalysisId) -> Result<bool> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        match jobs.get_mut(&job_id) {
            Some(snapshot) if matches!(snapshot.state, JobState::Queued) => {
                snapshot.state = JobState::Cancelled;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_progress(&self, job_id: AnalysisId, progress: JobProgress) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(snapshot) = jobs.get_mut(&job_id) {
            snapshot.state = JobState::Running;
            snapshot.progress = Some(progress);
        }
        Ok(())
    }

    async fn complete(&self, job_id: AnalysisId, outcome: JobOutcome) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(snapshot) = jobs.get_mut(&job_id) {
            match outcome {
                JobOutcome::Success => snapshot.state = JobState::Completed,
                JobOutcome::Failure(reason) => {
                    snapshot.state = JobState::Failed;
                    snapshot.failure_reason = Some(reason);
                }
            }
        }
        Ok(())
    }

    async fn drain(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeRecordStore {
    records: Mutex<HashMap<AnalysisId, AnalysisWithArtifacts>>,
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn create(&self, record: AnalysisRecord) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.contains_key(&record.id) {
            return Err(Error::Conflict {
                message: format!("analysis {} already exists", record.id),
            });
        }
        records.insert(
            record.id,
            AnalysisWithArtifacts {
                record,
                file_tree: None,
                parsed_files: Vec::new(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: AnalysisId) -> Result<Option<AnalysisWithArtifacts>> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: AnalysisId,
        status: AnalysisStatus,
        error: Option<String>,
    ) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let entry = records
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        entry.record.transition_to(status)?;
        entry.record.error = error;
        Ok(())
    }

    async fn update_commit_sha(&self, id: AnalysisId, sha: String) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let entry = records
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        entry.record.commit_sha = Some(sha);
        Ok(())
    }

    async fn update_branch(&self, id: AnalysisId, branch: String) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let entry = records
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        entry.record.branch = branch;
        Ok(())
    }

    async fn list(&self, query: ListQuery) -> Result<AnalysisPage> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut matching: Vec<AnalysisRecord> = records
            .values()
            .filter(|a| query.status.is_none_or(|s| a.record.status == s))
            .map(|a| a.record.clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        Ok(AnalysisPage {
            records: page,
            total,
        })
    }

    async fn delete(&self, id: AnalysisId) -> Result<bool> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.remove(&id).is_some())
    }

    async fn save_file_tree(&self, id: AnalysisId, tree: FileTreeArtifact) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let entry = records
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        entry.file_tree = Some(tree);
        Ok(())
    }

    async fn save_parsed_files(&self, id: AnalysisId, files: Vec<ParsedFile>) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let entry = records
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        for file in files {
            if !entry.parsed_files.iter().any(|f| f.path == file.path) {
                entry.parsed_files.push(file);
            }
        }
        Ok(())
    }
}

pub struct FakeRemoteFetcher;

#[async_trait]
impl RemoteFetcher for FakeRemoteFetcher {
    fn validate_url(&self, url: &str) -> Result<ParsedRepositoryUrl> {
        let (owner, name) = reposcope_domain::utils::parse_owner_repo(url)
            .ok_or_else(|| Error::validation(format!("invalid repository url: {url}")))?;
        Ok(ParsedRepositoryUrl {
            owner,
            name,
            normalized_url: url.to_owned(),
        })
    }

    async fn fetch_metadata(&self, _owner: &str, _name: &str) -> Result<RepositoryMetadata> {
        Ok(RepositoryMetadata {
            default_branch: "main".to_owned(),
        })
    }

    async fn resolve_commit(&self, _owner: &str, _name: &str, _branch: &str) -> Result<String> {
        Ok("0000000000000000000000000000000000dead".to_owned())
    }

    async fn clone(&self, _url: &str, options: CloneOptions) -> Result<ClonedRepository> {
        Ok(ClonedRepository {
            local_path: PathBuf::from("/tmp/reposcope-fake-clone"),
            commit_sha: "0000000000000000000000000000000000dead".to_owned(),
            branch: options.branch,
            cloned_at: Utc::now(),
        })
    }

    async fn dispose(&self, _local_path: &Path) -> Result<()> {
        Ok(())
    }
}

pub struct FakeTreeWalker;

#[async_trait]
impl TreeWalker for FakeTreeWalker {
    async fn build_tree(&self, root_path: &Path, _options: &AnalysisOptions) -> Result<Node> {
        Ok(Node::Directory {
            id: NodeId::new(),
            name: root_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: String::new(),
            children: Vec::new(),
        })
    }

    fn statistics(&self, _root: &Node) -> FileTreeStatistics {
        FileTreeStatistics {
            total_files: 0,
            total_directories: 0,
            total_lines: 0,
            total_size: 0,
            language_breakdown: std::collections::BTreeMap::new(),
        }
    }
}

pub struct FakeSourceParser;

impl SourceParser for FakeSourceParser {
    fn detect(&self, _path: &Path, _content_head: Option<&[u8]>) -> DetectionResult {
        DetectionResult {
            language: "unknown".to_owned(),
            confidence: Confidence::Low,
            basis: DetectionBasis::Unknown,
        }
    }

    fn is_parseable(&self, _language: &str) -> bool {
        false
    }

    fn parse(&self, _relative_path: &str, _language: &str, _content: &str) -> Option<ParsedFile> {
        None
    }
}

#[must_use]
pub fn fake_services() -> Services {
    Services::new(
        Arc::new(FakeRecordStore::default()),
        Arc::new(FakeJobQueue::default()),
        Arc::new(FakeRemoteFetcher),
        Arc::new(FakeTreeWalker),
        Arc::new(FakeSourceParser),
    )
}
