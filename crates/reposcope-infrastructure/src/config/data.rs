//! Configuration data structure.
//!
//! Unlike the teacher's nested `AppConfig` (sourced from Loco YAML plus
//! `MCP__SECTION__KEY` double-underscore env overrides), this spec's
//! environment surface (`spec.md` §6) is a flat table of plain variable
//! names, so `AppConfig` is a single flat struct rather than a nested
//! tree - there is no grouping convention to preserve.

use serde::{Deserialize, Serialize};

/// Deployment environment, mirroring `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeEnv {
    /// Local development; auth is bypassed when `API_KEY` is unset.
    Development,
    /// Production; error messages are redacted at the HTTP boundary.
    Production,
    /// Automated test runs.
    Test,
}

impl Default for NodeEnv {
    fn default() -> Self {
        Self::Development
    }
}

fn default_port() -> u16 {
    3001
}

fn default_api_version() -> String {
    "v1".to_owned()
}

fn default_queue_concurrency() -> usize {
    reposcope_domain::ports::DEFAULT_CONCURRENCY
}

fn default_job_timeout_ms() -> u64 {
    reposcope_domain::constants::DEFAULT_JOB_TIMEOUT_MS
}

fn default_clone_base_path() -> String {
    "/tmp/reposcope-repos".to_owned()
}

fn default_max_repo_size_mb() -> u32 {
    500
}

fn default_max_file_size_kb() -> u32 {
    reposcope_domain::value_objects::DEFAULT_MAX_FILE_SIZE_KB
}

fn default_include_tests() -> bool {
    true
}

fn default_rate_limit_window_ms() -> u64 {
    15 * 60 * 1000
}

fn default_max_requests() -> u32 {
    100
}

fn default_cors_origin() -> String {
    "*".to_owned()
}

/// Application configuration, sourced entirely from the process
/// environment per `spec.md` §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// `PORT` - HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// `API_VERSION` - route prefix segment, e.g. `/api/v1`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// `NODE_ENV`.
    #[serde(default)]
    pub node_env: NodeEnv,

    /// `DATABASE_URL` - required relational store connection string.
    pub database_url: String,

    /// `REDIS_HOST`.
    pub redis_host: Option<String>,
    /// `REDIS_PORT`.
    pub redis_port: Option<u16>,
    /// `REDIS_PASSWORD`.
    pub redis_password: Option<String>,

    /// `QUEUE_CONCURRENCY` - worker pool size.
    #[serde(default = "default_queue_concurrency")]
    pub queue_concurrency: usize,
    /// `JOB_TIMEOUT_MS`.
    #[serde(default = "default_job_timeout_ms")]
    pub job_timeout_ms: u64,

    /// `GITHUB_TOKEN` - optional remote-metadata API auth.
    pub github_token: Option<String>,

    /// `CLONE_BASE_PATH`.
    #[serde(default = "default_clone_base_path")]
    pub clone_base_path: String,
    /// `MAX_REPO_SIZE_MB`.
    #[serde(default = "default_max_repo_size_mb")]
    pub max_repo_size_mb: u32,

    /// `MAX_FILE_SIZE_KB` - default applied when a request omits
    /// `options.maxFileSizeKB`.
    #[serde(default = "default_max_file_size_kb")]
    pub max_file_size_kb: u32,
    /// `INCLUDE_TESTS` - default applied when a request omits
    /// `options.includeTests`.
    #[serde(default = "default_include_tests")]
    pub include_tests: bool,

    /// `RATE_LIMIT_WINDOW_MS` - global limiter window.
    #[serde(default = "default_rate_limit_window_ms")]
    pub rate_limit_window_ms: u64,
    /// `MAX_REQUESTS` - global limiter budget per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// `CORS_ORIGIN`.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// `CORS_CREDENTIALS`.
    #[serde(default)]
    pub cors_credentials: bool,

    /// `API_KEY` - when set, all requests must present `x-api-key`.
    pub api_key: Option<String>,
}
