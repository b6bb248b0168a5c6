//! Port traits implemented by the infrastructure crate and consumed by the
//! application/server crates. Kept free of any concrete infrastructure
//! dependency, per clean-architecture layering.

mod job_queue;
mod record_store;
mod remote_fetcher;
mod source_parser;
mod tree_walker;

pub use job_queue::{
    JobOutcome, JobQueue, JobState, JobStatusSnapshot, COMPLETED_RETENTION_MAX,
    COMPLETED_RETENTION_SECS, DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS,
    FAILED_RETENTION_SECS, RETRY_BASE_DELAY_MS,
};
pub use record_store::{AnalysisPage, AnalysisWithArtifacts, ListQuery, RecordStore};
pub use remote_fetcher::{
    ClonedRepository, CloneOptions, ParsedRepositoryUrl, RemoteFetcher, RepositoryMetadata,
};
pub use source_parser::{
    Confidence, DetectionBasis, DetectionResult, SourceParser, CONTENT_SNIFF_CAP_BYTES,
    DEFAULT_PARSE_FILE_LIMIT, DEFAULT_PARSE_FILE_SIZE_CAP_BYTES,
};
pub use tree_walker::{TreeWalker, DIRECTORY_SKIP_LIST};
