//! Explicit dependency-injection struct, built once at startup.
//!
//! Replaces the ambient module-level singletons of the source system
//! (queue/cache/store clients as process-wide globals) with one record
//! threaded into request handlers and the worker. Construction order
//! mirrors the component dependency order: Record Store, Job Queue,
//! Remote Fetcher, Tree Walker, Source Parser.

use std::sync::Arc;

use reposcope_domain::ports::{JobQueue, RecordStore, RemoteFetcher, SourceParser, TreeWalker};

/// Every backend dependency the application layer needs, grouped for
/// construction at startup and teardown in reverse order.
#[derive(Clone)]
pub struct Services {
    /// C5.
    pub record_store: Arc<dyn RecordStore>,
    /// C1.
    pub job_queue: Arc<dyn JobQueue>,
    /// C2.
    pub remote_fetcher: Arc<dyn RemoteFetcher>,
    /// C3.
    pub tree_walker: Arc<dyn TreeWalker>,
    /// C4.
    pub source_parser: Arc<dyn SourceParser>,
}

impl Services {
    /// Assemble a `Services` record from already-constructed adapters.
    #[must_use]
    pub fn new(
        record_store: Arc<dyn RecordStore>,
        job_queue: Arc<dyn JobQueue>,
        remote_fetcher: Arc<dyn RemoteFetcher>,
        tree_walker: Arc<dyn TreeWalker>,
        source_parser: Arc<dyn SourceParser>,
    ) -> Self {
        Self {
            record_store,
            job_queue,
            remote_fetcher,
            tree_walker,
            source_parser,
        }
    }
}
