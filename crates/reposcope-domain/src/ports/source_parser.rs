//! Port for language detection and structural extraction (C4).

use std::path::Path;

use crate::entities::ParsedFile;

/// Default maximum number of files parsed per job.
pub const DEFAULT_PARSE_FILE_LIMIT: usize = 100;

/// Default per-file size cap for parsing, in bytes.
pub const DEFAULT_PARSE_FILE_SIZE_CAP_BYTES: u64 = 500 * 1024;

/// Number of bytes sampled from a file's head for content-heuristic
/// detection.
pub const CONTENT_SNIFF_CAP_BYTES: usize = 5_000;

/// How confidently a language was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    /// Not detected.
    Low,
    /// Detected via content heuristic (regex match ratio).
    Medium,
    /// Detected via extension map or shebang.
    High,
}

/// What signal produced a [`DetectionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionBasis {
    /// File extension map.
    Extension,
    /// Shebang line.
    Shebang,
    /// Regex-based content heuristic.
    Content,
    /// No signal matched.
    Unknown,
}

/// Outcome of language detection for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    /// Lowercase language tag, `"unknown"` if undetected.
    pub language: String,
    /// How confident the detector is.
    pub confidence: Confidence,
    /// Which signal produced the result.
    pub basis: DetectionBasis,
}

/// Detects languages and extracts structure from source files (C4).
///
/// Parsing is best-effort: implementations must catch and log any
/// internal failure and return `None` rather than propagate, per the
/// spec's "parse reports no errors to the caller" contract.
pub trait SourceParser: Send + Sync {
    /// Detect the language of a file from its path and an optional sample
    /// of its content (used for shebang/heuristic detection).
    fn detect(&self, path: &Path, content_head: Option<&[u8]>) -> DetectionResult;

    /// True if `language` is in the fully-parseable set
    /// (`typescript`, `javascript`, `python`).
    fn is_parseable(&self, language: &str) -> bool;

    /// Extract structure from `content`, assumed to already be classified
    /// as `language`. Returns `None` if the language is not parseable or
    /// parsing fails internally.
    fn parse(&self, relative_path: &str, language: &str, content: &str) -> Option<ParsedFile>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_orders_low_below_high() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }
}
