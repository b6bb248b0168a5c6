//! Port for validating, resolving and materializing a remote repository
//! (C2).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;

/// Repository coordinates parsed from a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRepositoryUrl {
    /// Owner / organization segment.
    pub owner: String,
    /// Repository name segment.
    pub name: String,
    /// Normalized form of the input URL.
    pub normalized_url: String,
}

/// Metadata fetched from the remote host's REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    /// The repository's default branch.
    pub default_branch: String,
}

/// Result of materializing a shallow working copy.
#[derive(Debug, Clone)]
pub struct ClonedRepository {
    /// Absolute local path of the working copy.
    pub local_path: std::path::PathBuf,
    /// Resolved commit sha checked out.
    pub commit_sha: String,
    /// Branch checked out.
    pub branch: String,
    /// When the clone completed.
    pub cloned_at: DateTime<Utc>,
}

/// Options controlling [`RemoteFetcher::clone`].
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Branch to check out.
    pub branch: String,
    /// History depth; the spec always uses 1.
    pub depth: u32,
    /// Whether to fetch only the requested branch.
    pub single_branch: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            branch: String::new(),
            depth: 1,
            single_branch: true,
        }
    }
}

/// Validates URLs, resolves remote metadata, and materializes/disposes
/// shallow working copies (C2).
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Parse and validate a repository URL.
    ///
    /// # Errors
    /// Returns [`crate::Error::Validation`] if the URL has fewer than two
    /// path segments or does not reference the supported host.
    fn validate_url(&self, url: &str) -> Result<ParsedRepositoryUrl>;

    /// Fetch the repository's default branch and related metadata.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] on a 404, [`crate::Error::
    /// ServiceUnavailable`] on a 403/5xx or transport failure.
    async fn fetch_metadata(&self, owner: &str, name: &str) -> Result<RepositoryMetadata>;

    /// Resolve `branch` to a commit sha.
    ///
    /// # Errors
    /// Same failure modes as [`Self::fetch_metadata`].
    async fn resolve_commit(&self, owner: &str, name: &str, branch: &str) -> Result<String>;

    /// Materialize a shallow, single-branch working copy under a fresh,
    /// unique subdirectory of the configured base path. Any failure during
    /// materialization removes the partial directory before returning.
    ///
    /// # Errors
    /// Returns [`crate::Error::Vcs`] on clone failure.
    async fn clone(&self, url: &str, options: CloneOptions) -> Result<ClonedRepository>;

    /// Remove a working copy. Idempotent: calling twice, or on a path that
    /// no longer exists, is not an error.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] only for failures other than "already
    /// gone".
    async fn dispose(&self, local_path: &std::path::Path) -> Result<()>;
}
