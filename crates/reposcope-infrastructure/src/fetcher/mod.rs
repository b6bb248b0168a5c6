//! `RemoteFetcher` adapter (C2): `git2` for materializing working copies,
//! `reqwest` against the host's REST API for metadata/commit resolution.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use reposcope_domain::ports::{
    ClonedRepository, CloneOptions, ParsedRepositoryUrl, RemoteFetcher, RepositoryMetadata,
};
use reposcope_domain::{Error, Result};

/// `git2` + `reqwest`-backed [`RemoteFetcher`]. Clones are shallow
/// (depth 1, single branch) into a fresh subdirectory of `base_path`,
/// matching the "tree snapshot only" rationale in `spec.md` §4.2.
pub struct Git2Fetcher {
    base_path: PathBuf,
    http: reqwest::Client,
    github_token: Option<String>,
}

impl Git2Fetcher {
    /// Build a fetcher rooted at `base_path` (created on first clone if
    /// missing), optionally authenticating metadata requests with a
    /// GitHub token.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, github_token: Option<String>) -> Self {
        Self {
            base_path: base_path.into(),
            http: reqwest::Client::new(),
            github_token,
        }
    }

    fn api_request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .get(url)
            .header("user-agent", "reposcope")
            .header("accept", "application/vnd.github+json");
        match &self.github_token {
            Some(token) => builder.header("authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .api_request(url)
            .send()
            .await
            .map_err(|err| Error::service_unavailable(format!("request to {url} failed: {err}")))?;
        match response.status().as_u16() {
            200..=299 => response
                .json()
                .await
                .map_err(|err| Error::service_unavailable(format!("invalid response body: {err}"))),
            404 => Err(Error::not_found(format!("{url} returned 404"))),
            403 | 500..=599 => Err(Error::service_unavailable(format!(
                "{url} returned {}",
                response.status()
            ))),
            other => Err(Error::service_unavailable(format!(
                "{url} returned unexpected status {other}"
            ))),
        }
    }
}

#[async_trait]
impl RemoteFetcher for Git2Fetcher {
    fn validate_url(&self, url: &str) -> Result<ParsedRepositoryUrl> {
        let (owner, name) = reposcope_domain::utils::parse_owner_repo(url)
            .ok_or_else(|| Error::validation(format!("invalid repository url: {url}")))?;
        Ok(ParsedRepositoryUrl {
            owner,
            name,
            normalized_url: url.trim().to_owned(),
        })
    }

    async fn fetch_metadata(&self, owner: &str, name: &str) -> Result<RepositoryMetadata> {
        let url = format!("https://api.github.com/repos/{owner}/{name}");
        let body = self.get_json(&url).await?;
        let default_branch = body
            .get("default_branch")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("main")
            .to_owned();
        Ok(RepositoryMetadata { default_branch })
    }

    async fn resolve_commit(&self, owner: &str, name: &str, branch: &str) -> Result<String> {
        let url = format!("https://api.github.com/repos/{owner}/{name}/commits/{branch}");
        let body = self.get_json(&url).await?;
        body.get("sha")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| Error::service_unavailable(format!("{url} missing sha field")))
    }

    async fn clone(&self, url: &str, options: CloneOptions) -> Result<ClonedRepository> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        let destination = self.base_path.join(uuid::Uuid::new_v4().to_string());
        let url = url.to_owned();
        let dest_for_blocking = destination.clone();
        let branch = options.branch.clone();
        let clone_result = tokio::task::spawn_blocking(move || {
            clone_blocking(&url, &dest_for_blocking, &branch, options.depth)
        })
        .await
        .map_err(|err| Error::vcs(format!("clone task panicked: {err}")))?;

        let commit_sha = match clone_result {
            Ok(sha) => sha,
            Err(err) => {
                let _ = tokio::fs::remove_dir_all(&destination).await;
                return Err(err);
            }
        };

        Ok(ClonedRepository {
            local_path: destination,
            commit_sha,
            branch: options.branch,
            cloned_at: Utc::now(),
        })
    }

    async fn dispose(&self, local_path: &Path) -> Result<()> {
        match tokio::fs::remove_dir_all(local_path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::Io(err)),
        }
    }
}

fn clone_blocking(url: &str, destination: &Path, branch: &str, depth: u32) -> Result<String> {
    let mut fetch_options = git2::FetchOptions::new();
    fetch_options.depth(depth as i32);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_options);
    if !branch.is_empty() {
        builder.branch(branch);
    }

    let repo = builder
        .clone(url, destination)
        .map_err(|err| Error::vcs(format!("clone of {url} failed: {err}")))?;

    let head = repo
        .head()
        .map_err(|err| Error::vcs(format!("failed to resolve HEAD: {err}")))?;
    let commit = head
        .peel_to_commit()
        .map_err(|err| Error::vcs(format!("failed to peel HEAD to commit: {err}")))?;
    Ok(commit.id().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_https_url() {
        let fetcher = Git2Fetcher::new("/tmp/reposcope-test", None);
        let parsed = fetcher
            .validate_url("https://github.com/acme/widgets")
            .unwrap();
        assert_eq!(parsed.owner, "acme");
        assert_eq!(parsed.name, "widgets");
    }

    #[test]
    fn rejects_url_without_two_segments() {
        let fetcher = Git2Fetcher::new("/tmp/reposcope-test", None);
        assert!(fetcher.validate_url("https://example.com/x").is_err());
    }
}
