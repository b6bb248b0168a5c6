//! `TreeWalker` adapter (C3): recursive filesyster walk using `ignore`'s
//! gitignore matcher, grounded on `mcb-application/src/use_cases/
//! indexing_service.rs`'s `discover_files` (walker over `ignore`) and
//! `mcb-domain/src/value_objects/browse/tree.rs`'s directories-first,
//! case-insensitive sibling ordering (reused here via `Node::
//! sort_children`).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use reposcope_domain::ports::{SourceParser, CONTENT_SNIFF_CAP_BYTES, DIRECTORY_SKIP_LIST};
use reposcope_domain::value_objects::{
    extension_of, AnalysisOptions, FileTreeStatistics, Metadata, Node, NodeId,
};
use reposcope_domain::{Error, Result};
use tracing::warn;

/// Conservative default ignore patterns applied before any `.gitignore`
/// content, per `spec.md` §4.3's "built-in default pattern set" - not
/// directory-skip-list entries (those are absolute, see
/// [`DIRECTORY_SKIP_LIST`]), just common noise every walk should drop.
const BUILTIN_DEFAULT_PATTERNS: &[&str] = &["*.lock", ".DS_Store", "*.log", "*.tmp"];

/// Filesystem walker producing a [`Node`] tree, honoring the skip list,
/// gitignore, caller excludes, size and test filters.
pub struct IgnoreTreeWalker {
    source_parser: Arc<dyn SourceParser>,
}

impl IgnoreTreeWalker {
    /// Build a walker that uses `source_parser` for per-file language
    /// detection while walking.
    #[must_use]
    pub fn new(source_parser: Arc<dyn SourceParser>) -> Self {
        Self { source_parser }
    }
}

#[async_trait]
impl reposcope_domain::ports::TreeWalker for IgnoreTreeWalker {
    async fn build_tree(
        &self,
        root_path: &Path,
        options: &AnalysisOptions,
    ) -> Result<Node> {
        let root_path = root_path.to_path_buf();
        let options = options.clone();
        let source_parser = Arc::clone(&self.source_parser);
        tokio::task::spawn_blocking(move || build_tree_blocking(&root_path, &options, &*source_parser))
            .await
            .map_err(|err| Error::internal(format!("tree walk task panicked: {err}")))?
    }

    fn statistics(&self, root: &Node) -> FileTreeStatistics {
        let mut stats = FileTreeStatistics {
            total_files: 0,
            total_directories: 0,
            total_lines: 0,
            total_size: 0,
            language_breakdown: BTreeMap::new(),
        };
        accumulate(root, &mut stats, true);
        stats
    }
}

fn accumulate(node: &Node, stats: &mut FileTreeStatistics, is_root: bool) {
    match node {
        Node::File { metadata, .. } => {
            stats.total_files += 1;
            stats.total_lines += metadata.lines_of_code;
            stats.total_size += metadata.size as i64;
            *stats
                .language_breakdown
                .entry(metadata.language.clone())
                .or_insert(0) += 1;
        }
        Node::Directory { children, .. } => {
            if !is_root {
                stats.total_directories += 1;
            }
            for child in children {
                accumulate(child, stats, false);
            }
        }
    }
}

fn build_gitignore(root: &Path, exclude_patterns: Option<&[String]>) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in BUILTIN_DEFAULT_PATTERNS {
        let _ = builder.add_line(None, pattern);
    }
    let dot_gitignore = root.join(".gitignore");
    if dot_gitignore.is_file() {
        let _ = builder.add(dot_gitignore);
    }
    for pattern in exclude_patterns.into_iter().flatten() {
        let _ = builder.add_line(None, pattern);
    }
    builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn build_tree_blocking(
    root_path: &Path,
    options: &AnalysisOptions,
    source_parser: &dyn SourceParser,
) -> Result<Node> {
    if !root_path.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", root_path.display()),
        )));
    }
    let gitignore = build_gitignore(root_path, options.exclude_patterns.as_deref());
    let mut root = walk_dir(root_path, root_path, &gitignore, options, source_parser);
    root.sort_children();
    Ok(root)
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    gitignore: &Gitignore,
    options: &AnalysisOptions,
    source_parser: &dyn SourceParser,
) -> Node {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let relative = relative_path(root, dir);

    let mut children = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "failed to read directory, skipping");
            return Node::Directory {
                id: NodeId::new(),
                name,
                path: relative,
                children,
            };
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "failed to read directory entry, skipping");
                continue;
            }
        };
        let path = entry.path();
        let entry_name = entry.file_name().to_string_lossy().into_owned();

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to stat entry, skipping");
                continue;
            }
        };

        if file_type.is_dir() {
            if DIRECTORY_SKIP_LIST.contains(&entry_name.as_str()) {
                continue;
            }
            if gitignore.matched_path_or_any_parents(&path, true).is_ignore() {
                continue;
            }
            children.push(walk_dir(root, &path, gitignore, options, source_parser));
            continue;
        }

        if gitignore.matched_path_or_any_parents(&path, false).is_ignore() {
            continue;
        }

        match build_file_node(root, &path, file_type.is_symlink(), options, source_parser) {
            Ok(Some(node)) => children.push(node),
            Ok(None) => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read file, skipping");
            }
        }
    }

    Node::Directory {
        id: NodeId::new(),
        name,
        path: relative,
        children,
    }
}

fn build_file_node(
    root: &Path,
    path: &Path,
    is_symlink: bool,
    options: &AnalysisOptions,
    source_parser: &dyn SourceParser,
) -> Result<Option<Node>> {
    let relative = relative_path(root, path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if is_symlink {
        let metadata = Metadata {
            language: "unknown".to_owned(),
            extension: extension_of(path),
            size: 0,
            lines_of_code: 0,
            is_test: Metadata::path_is_test(&relative),
            is_config: Metadata::basename_is_config(&name),
            last_modified: Utc::now(),
        };
        return Ok(Some(Node::File {
            id: NodeId::new(),
            name,
            path: relative,
            metadata,
        }));
    }

    let fs_metadata = std::fs::metadata(path)?;
    let size = fs_metadata.len();
    if size > u64::from(options.max_file_size_kb) * 1024 {
        return Ok(None);
    }

    let mut file = std::fs::File::open(path)?;
    let mut head = vec![0u8; CONTENT_SNIFF_CAP_BYTES];
    let read = file.read(&mut head)?;
    head.truncate(read);

    let mut content = head.clone();
    if (size as usize) > content.len() {
        let mut rest = Vec::new();
        file.read_to_end(&mut rest)?;
        content.extend(rest);
    }

    let detection = source_parser.detect(path, Some(&head));
    let lines_of_code = Metadata::count_lines(&content);
    let is_test = Metadata::path_is_test(&relative);
    if !options.include_tests && is_test {
        return Ok(None);
    }
    if let Some(allowlist) = &options.languages {
        if !allowlist.contains(&detection.language) {
            return Ok(None);
        }
    }

    let last_modified: DateTime<Utc> = fs_metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let metadata = Metadata {
        language: detection.language,
        extension: extension_of(path),
        size,
        lines_of_code,
        is_test,
        is_config: Metadata::basename_is_config(&name),
        last_modified,
    };

    Ok(Some(Node::File {
        id: NodeId::new(),
        name,
        path: relative,
        metadata,
    }))
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reposcope_domain::ports::{Confidence, DetectionBasis, DetectionResult};
    use reposcope_domain::entities::ParsedFile;

    struct StubParser;
    impl SourceParser for StubParser {
        fn detect(&self, path: &Path, _content_head: Option<&[u8]>) -> DetectionResult {
            let lang = if path.extension().is_some_and(|e| e == "rs") {
                "rust"
            } else {
                "unknown"
            };
            DetectionResult {
                language: lang.to_owned(),
                confidence: Confidence::High,
                basis: DetectionBasis::Extension,
            }
        }
        fn is_parseable(&self, _language: &str) -> bool {
            false
        }
        fn parse(&self, _relative_path: &str, _language: &str, _content: &str) -> Option<ParsedFile> {
            None
        }
    }

    #[tokio::test]
    async fn builds_tree_skipping_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
        std::fs::create_dir(dir.path().join("target")).unwrap();
        std::fs::write(dir.path().join("target").join("junk.txt"), "x").unwrap();

        let walker = IgnoreTreeWalker::new(Arc::new(StubParser));
        let tree = reposcope_domain::ports::TreeWalker::build_tree(
            &walker,
            dir.path(),
            &AnalysisOptions::default(),
        )
        .await
        .unwrap();

        let Node::Directory { children, .. } = &tree else {
            unreachable!()
        };
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name(), "main.rs");
    }

    #[tokio::test]
    async fn drops_files_over_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.txt"), vec![b'x'; 4096]).unwrap();

        let walker = IgnoreTreeWalker::new(Arc::new(StubParser));
        let options = AnalysisOptions {
            max_file_size_kb: 1,
            ..Default::default()
        };
        let tree = reposcope_domain::ports::TreeWalker::build_tree(&walker, dir.path(), &options)
            .await
            .unwrap();
        let Node::Directory { children, .. } = &tree else {
            unreachable!()
        };
        assert!(children.is_empty());
    }
}
