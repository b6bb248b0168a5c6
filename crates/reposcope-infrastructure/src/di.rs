//! Bootstrap: wires concrete adapters into a [`Services`] record and a
//! [`JobRunner`], grounded on `mcb-infrastructure/src/di/` (constructor
//! injection over trait objects, no framework-managed container).

use std::sync::Arc;

use reposcope_application::{Services, Worker};
use reposcope_domain::ports::{JobQueue, RecordStore};
use reposcope_lang::ParserService;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

use crate::config::AppConfig;
use crate::fetcher::Git2Fetcher;
use crate::queue::{InMemoryJobQueue, JobRunner, RedisJobQueue};
use crate::store::migration::Migrator;
use crate::store::SeaOrmRecordStore;
use crate::walker::IgnoreTreeWalker;

/// Everything [`bootstrap`] produced: the wired [`Services`] record plus
/// a [`JobRunner`] ready to drive queued jobs.
pub struct Application {
    /// Application-layer services (record store, queue, fetcher, walker,
    /// parser).
    pub services: Services,
    /// Drives a queued job to completion with retries.
    pub runner: JobRunner,
}

/// Connect to the database, run pending migrations, and construct every
/// adapter named in `config`.
///
/// # Errors
/// Returns [`reposcope_domain::Error::ServiceUnavailable`] if the database
/// or an optional Redis backend cannot be reached.
pub async fn bootstrap(config: &AppConfig) -> reposcope_domain::Result<Application> {
    let options = ConnectOptions::new(config.database_url.clone());
    let connection = Database::connect(options).await.map_err(|err| {
        reposcope_domain::Error::service_unavailable(format!("database connect failed: {err}"))
    })?;
    Migrator::up(&connection, None).await.map_err(|err| {
        reposcope_domain::Error::service_unavailable(format!("migration failed: {err}"))
    })?;
    let record_store: Arc<dyn RecordStore> =
        Arc::new(SeaOrmRecordStore::new(Arc::new(connection)));

    let job_queue: Arc<dyn JobQueue> = match &config.redis_host {
        Some(host) => {
            let port = config.redis_port.unwrap_or(6379);
            let redis_url = match &config.redis_password {
                Some(password) => format!("redis://:{password}@{host}:{port}"),
                None => format!("redis://{host}:{port}"),
            };
            Arc::new(RedisJobQueue::connect(&redis_url).await?)
        }
        None => Arc::new(InMemoryJobQueue::new()),
    };

    let source_parser = Arc::new(ParserService::new());
    let remote_fetcher = Arc::new(Git2Fetcher::new(
        config.clone_base_path.clone(),
        config.github_token.clone(),
    ));
    let tree_walker = Arc::new(IgnoreTreeWalker::new(source_parser.clone()));

    let services = Services::new(
        record_store,
        job_queue,
        remote_fetcher,
        tree_walker,
        source_parser,
    );
    let worker = Arc::new(Worker::new(services.clone()));
    let runner = JobRunner::new(worker);

    Ok(Application { services, runner })
}
