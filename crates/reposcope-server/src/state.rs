//! Shared axum handler state.

use std::sync::Arc;

use reposcope_application::Services;
use reposcope_infrastructure::config::AppConfig;
use reposcope_infrastructure::queue::JobRunner;

use crate::middleware::rate_limit::IpRateLimiter;

/// Everything a handler needs: the wired application services, the job
/// runner that spawns accepted jobs, and the loaded configuration.
///
/// Cheap to clone - every field is itself an `Arc` or a small `Clone`
/// record, mirroring the teacher's `McbState` shared-state-over-axum
/// pattern without a second wrapping `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application-layer services (record store, queue, fetcher, walker).
    pub services: Services,
    /// Spawns accepted jobs onto the tokio runtime.
    pub runner: JobRunner,
    /// Loaded, validated configuration.
    pub config: Arc<AppConfig>,
    /// Global limiter: `RATE_LIMIT_WINDOW_MS`/`MAX_REQUESTS` per client IP.
    pub global_limiter: Arc<IpRateLimiter>,
    /// Strict limiter: 10/hour per client IP, `POST /analyze` only.
    pub strict_limiter: Arc<IpRateLimiter>,
}

impl AppState {
    /// Build state from a bootstrapped [`reposcope_infrastructure::Application`]
    /// and its source config.
    #[must_use]
    pub fn new(app: reposcope_infrastructure::Application, config: AppConfig) -> Self {
        let global_limiter = crate::middleware::rate_limit::global_limiter(
            config.rate_limit_window_ms,
            config.max_requests,
        );
        let strict_limiter = crate::middleware::rate_limit::strict_limiter();
        Self {
            services: app.services,
            runner: app.runner,
            config: Arc::new(config),
            global_limiter,
            strict_limiter,
        }
    }
}
