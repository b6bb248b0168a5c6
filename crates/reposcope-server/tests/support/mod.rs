//! In-memory fakes for HTTP-layer integration tests, mirroring
//! `mcb-server`'s `tests/test_utils/mock_services/` pattern (one fake per
//! port, assembled into a `Services` record) and
//! `reposcope-application`'s own (test-only, private) fakes - duplicated
//! here since this crate cannot see that private module.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use reposcope_application::{Services, Worker};
use reposcope_domain::entities::{AnalysisRecord, AnalysisStatus, ParsedFile};
use reposcope_domain::ports::{
    AnalysisPage, AnalysisWithArtifacts, ClonedRepository, CloneOptions, Confidence,
    DetectionBasis, DetectionResult, JobOutcome, JobQueue, JobState, JobStatusSnapshot,
    ListQuery, ParsedRepositoryUrl, RecordStore, RemoteFetcher, RepositoryMetadata, SourceParser,
    TreeWalker,
};
use reposcope_domain::value_objects::{
    AnalysisId, AnalysisOptions, FileTreeArtifact, FileTreeStatistics, JobProgress, Node, NodeId,
};
use reposcope_domain::{Error, Result};
use reposcope_infrastructure::config::{AppConfig, NodeEnv};
use reposcope_infrastructure::queue::JobRunner;
use reposcope_server::state::AppState;

#[derive(Default)]
pub struct FakeJobQueue {
    jobs: Mutex<HashMap<AnalysisId, JobStatusSnapshot>>,
}

#[async_trait]
impl JobQueue for FakeJobQueue {
    async fn enqueue(&self, job_id: AnalysisId) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
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
        Ok(jobs.get(&job_id).cloned())
    }

    async fn cancel(&self, _job_id: AnalysisId) -> Result<bool> {
        Ok(false)
    }

    async fn update_progress(&self, _job_id: AnalysisId, _progress: JobProgress) -> Result<()> {
        Ok(())
    }

    async fn complete(&self, _job_id: AnalysisId, _outcome: JobOutcome) -> Result<()> {
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
        entry.parsed_files = files;
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
            language_breakdown: BTreeMap::new(),
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

fn fake_services() -> Services {
    Services::new(
        Arc::new(FakeRecordStore::default()),
        Arc::new(FakeJobQueue::default()),
        Arc::new(FakeRemoteFetcher),
        Arc::new(FakeTreeWalker),
        Arc::new(FakeSourceParser),
    )
}

fn fake_config() -> AppConfig {
    AppConfig {
        port: 3001,
        api_version: "v1".to_owned(),
        node_env: NodeEnv::Test,
        database_url: "sqlite::memory:".to_owned(),
        redis_host: None,
        redis_port: None,
        redis_password: None,
        queue_concurrency: 5,
        job_timeout_ms: 600_000,
        github_token: None,
        clone_base_path: "/tmp/reposcope-test".to_owned(),
        max_repo_size_mb: 500,
        max_file_size_kb: 1000,
        include_tests: true,
        rate_limit_window_ms: 15 * 60 * 1000,
        max_requests: 100,
        cors_origin: "*".to_owned(),
        cors_credentials: false,
        api_key: None,
    }
}

/// Build [`AppState`] over fakes, with a fresh config overridable by
/// the caller (e.g. to set `api_key` or a tight rate limit).
#[must_use]
pub fn test_state(configure: impl FnOnce(&mut AppConfig)) -> AppState {
    let services = fake_services();
    let worker = Arc::new(Worker::new(services.clone()));
    let runner = JobRunner::new(worker);
    let mut config = fake_config();
    configure(&mut config);
    let app = reposcope_infrastructure::Application { services, runner };
    AppState::new(app, config)
}
