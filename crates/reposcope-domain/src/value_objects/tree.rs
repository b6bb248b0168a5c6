//! The file tree artifact produced by the Tree Walker.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NodeId;

/// Basename fragments that mark a file as test code, per the spec's
/// `isTest` rule.
pub const TEST_MARKERS: &[&str] = &[".test.", ".spec.", "__tests__", "/test/", "/tests/"];

/// Basename fragments that mark a file as configuration, per the spec's
/// `isConfig` rule.
pub const CONFIG_MARKERS: &[&str] = &[
    "config",
    ".rc",
    "package.json",
    "tsconfig",
    "webpack",
    "babel",
    "eslint",
    "prettier",
    ".env",
];

/// Per-file metadata attached to file nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Lowercase language tag, "unknown" if undetected.
    pub language: String,
    /// Lowercased extension including the leading dot, e.g. `.rs`.
    pub extension: String,
    /// File size in bytes.
    pub size: u64,
    /// Line count: separators + 1, or 0 on read error / empty file.
    pub lines_of_code: u64,
    /// True if the path matches any of [`TEST_MARKERS`].
    pub is_test: bool,
    /// True if the basename matches any of [`CONFIG_MARKERS`].
    pub is_config: bool,
    /// Filesystem modification time.
    pub last_modified: DateTime<Utc>,
}

impl Metadata {
    /// True if `relative_path` matches any test marker.
    #[must_use]
    pub fn path_is_test(relative_path: &str) -> bool {
        let normalized = format!("/{}", relative_path.replace('\\', "/"));
        TEST_MARKERS
            .iter()
            .any(|marker| normalized.contains(marker))
    }

    /// True if `basename` matches any config marker.
    #[must_use]
    pub fn basename_is_config(basename: &str) -> bool {
        let lower = basename.to_lowercase();
        CONFIG_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    /// Count lines the way the spec defines `linesOfCode`: separators + 1,
    /// or 0 for empty content.
    #[must_use]
    pub fn count_lines(content: &[u8]) -> u64 {
        if content.is_empty() {
            return 0;
        }
        content.iter().filter(|&&b| b == b'\n').count() as u64 + 1
    }
}

/// A node in the file tree: either a directory with children, or a file
/// with [`Metadata`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// A directory node.
    Directory {
        /// Opaque id, unique within one build.
        id: NodeId,
        /// Display name (basename).
        name: String,
        /// Path relative to the working-copy root.
        path: String,
        /// Children, directories first then files, each group sorted
        /// case-insensitively ascending by name.
        children: Vec<Node>,
    },
    /// A file node.
    File {
        /// Opaque id, unique within one build.
        id: NodeId,
        /// Display name (basename).
        name: String,
        /// Path relative to the working-copy root.
        path: String,
        /// File metadata.
        metadata: Metadata,
    },
}

impl Node {
    /// Name of this node, regardless of kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Relative path of this node, regardless of kind.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. } | Self::File { path, .. } => path,
        }
    }

    /// True if this node is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Recursively sort children: directories before files, each group
    /// ascending case-insensitively by name.
    pub fn sort_children(&mut self) {
        if let Self::Directory { children, .. } = self {
            children.sort_by(|a, b| match (a.is_directory(), b.is_directory()) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            });
            for child in children {
                child.sort_children();
            }
        }
    }

    /// Count file and directory nodes in this subtree (self inclusive for
    /// directories other than the root, which the caller excludes).
    #[must_use]
    pub fn counts(&self) -> (u64, u64) {
        match self {
            Self::File { .. } => (1, 0),
            Self::Directory { children, .. } => {
                children.iter().fold((0, 1), |(files, dirs), child| {
                    let (cf, cd) = child.counts();
                    (files + cf, dirs + cd)
                })
            }
        }
    }
}

/// Aggregate statistics over a [`FileTreeArtifact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTreeStatistics {
    /// Total file nodes in the tree.
    pub total_files: u64,
    /// Total directory nodes in the tree (root excluded).
    pub total_directories: u64,
    /// Sum of `linesOfCode` over all file nodes.
    pub total_lines: u64,
    /// Sum of `size` over all file nodes. 64-bit to tolerate large repos
    /// (see `DESIGN.md`'s BigInteger decision).
    pub total_size: i64,
    /// Language tag to file count.
    pub language_breakdown: BTreeMap<String, u64>,
}

impl FileTreeStatistics {
    /// Average file size, 0 when `total_files` is 0 (no division by zero).
    #[must_use]
    pub fn average_file_size(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.total_size as f64 / self.total_files as f64
        }
    }
}

/// The file tree artifact bound 1:1 to a completed `AnalysisRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTreeArtifact {
    /// The root directory node.
    pub root: Node,
    /// Aggregate statistics.
    pub statistics: FileTreeStatistics,
}

/// Lowercased extension including leading dot, or empty string for
/// extensionless files.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_node(name: &str) -> Node {
        Node::File {
            id: NodeId::new(),
            name: name.to_owned(),
            path: name.to_owned(),
            metadata: Metadata {
                language: "unknown".to_owned(),
                extension: String::new(),
                size: 0,
                lines_of_code: 0,
                is_test: false,
                is_config: false,
                last_modified: Utc::now(),
            },
        }
    }

    fn dir_node(name: &str, children: Vec<Node>) -> Node {
        Node::Directory {
            id: NodeId::new(),
            name: name.to_owned(),
            path: name.to_owned(),
            children,
        }
    }

    #[test]
    fn directories_sort_before_files_case_insensitive() {
        let mut root = dir_node(
            "root",
            vec![
                file_node("Zebra.ts"),
                dir_node("beta", vec![]),
                file_node("alpha.ts"),
                dir_node("Alpha", vec![]),
            ],
        );
        root.sort_children();
        let Node::Directory { children, .. } = &root else {
            unreachable!()
        };
        let names: Vec<&str> = children.iter().map(Node::name).collect();
        assert_eq!(names, vec!["Alpha", "beta", "alpha.ts", "Zebra.ts"]);
    }

    #[test]
    fn counts_match_tree_shape() {
        let root = dir_node(
            "root",
            vec![
                file_node("a.ts"),
                dir_node("nested", vec![file_node("b.py")]),
            ],
        );
        let (files, dirs) = root.counts();
        assert_eq!(files, 2);
        assert_eq!(dirs, 2); // root + nested
    }

    #[test]
    fn empty_tree_has_zero_average_size() {
        let stats = FileTreeStatistics {
            total_files: 0,
            total_directories: 1,
            total_lines: 0,
            total_size: 0,
            language_breakdown: BTreeMap::new(),
        };
        assert_eq!(stats.average_file_size(), 0.0);
    }

    #[test]
    fn is_test_recognizes_markers() {
        assert!(Metadata::path_is_test("src/components/button.test.tsx"));
        assert!(Metadata::path_is_test("src/__tests__/button.tsx"));
        assert!(!Metadata::path_is_test("src/components/button.tsx"));
    }

    #[test]
    fn is_config_recognizes_markers() {
        assert!(Metadata::basename_is_config("tsconfig.json"));
        assert!(Metadata::basename_is_config("package.json"));
        assert!(!Metadata::basename_is_config("index.ts"));
    }

    #[test]
    fn count_lines_matches_spec() {
        assert_eq!(Metadata::count_lines(b""), 0);
        assert_eq!(Metadata::count_lines(b"a"), 1);
        assert_eq!(Metadata::count_lines(b"a\nb"), 2);
        assert_eq!(Metadata::count_lines(b"a\nb\n"), 3);
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(extension_of(Path::new("Main.TS")), ".ts");
        assert_eq!(extension_of(Path::new("README")), "");
    }
}
