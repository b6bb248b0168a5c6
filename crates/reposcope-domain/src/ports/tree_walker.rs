//! Port for the working-copy tree walk (C3).

use std::path::Path;

use async_trait::async_trait;

use crate::value_objects::{AnalysisOptions, FileTreeStatistics, Node};
use crate::Result;

/// Directories never descended into nor emitted as children, regardless of
/// gitignore or caller patterns.
pub const DIRECTORY_SKIP_LIST: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "coverage",
    ".next",
    ".nuxt",
    "out",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    "target",
    "bin",
    "obj",
    ".idea",
    ".vscode",
];

/// Walks a working copy under ignore rules, classifying files and building
/// a tree with aggregate statistics (C3).
#[async_trait]
pub trait TreeWalker: Send + Sync {
    /// Build the directory tree rooted at `root_path`, honoring the
    /// skip-list, `.gitignore`, `options.exclude_patterns`, the file-size
    /// filter, and the test filter. Individual entry read/stat failures
    /// log a warning and are skipped; they never abort the walk.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] only if `root_path` itself cannot be
    /// read.
    async fn build_tree(&self, root_path: &Path, options: &AnalysisOptions) -> Result<Node>;

    /// Compute aggregate statistics over an already-built tree.
    #[must_use]
    fn statistics(&self, root: &Node) -> FileTreeStatistics;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_list_matches_spec() {
        assert!(DIRECTORY_SKIP_LIST.contains(&"node_modules"));
        assert!(DIRECTORY_SKIP_LIST.contains(&".git"));
        assert!(DIRECTORY_SKIP_LIST.contains(&"target"));
        assert_eq!(DIRECTORY_SKIP_LIST.len(), 16);
    }
}
