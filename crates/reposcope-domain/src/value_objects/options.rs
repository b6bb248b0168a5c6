//! Per-analysis options supplied at intake.

use serde::{Deserialize, Serialize};

/// Default `maxFileSizeKB` when the caller does not specify one.
pub const DEFAULT_MAX_FILE_SIZE_KB: u32 = 1000;

/// Smallest accepted `maxFileSizeKB`.
pub const MIN_MAX_FILE_SIZE_KB: u32 = 1;

/// Largest accepted `maxFileSizeKB`.
pub const MAX_MAX_FILE_SIZE_KB: u32 = 10_000;

/// Options a caller may attach to an analysis request.
///
/// Every field has a default, so an absent `options` object at intake is
/// equivalent to `AnalysisOptions::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Whether files classified as tests are included in the walk.
    #[serde(default = "default_include_tests")]
    pub include_tests: bool,

    /// Files larger than this are dropped during the walk.
    #[serde(default = "default_max_file_size_kb")]
    pub max_file_size_kb: u32,

    /// Optional allowlist of language tags; when present, only matching
    /// files are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,

    /// Additional ignore globs supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_patterns: Option<Vec<String>>,

    /// Reserved; accepted at intake but not consumed by the worker. The
    /// parse step (C4) always runs regardless of this flag.
    #[serde(default)]
    pub deep_analysis: bool,
}

fn default_include_tests() -> bool {
    true
}

fn default_max_file_size_kb() -> u32 {
    DEFAULT_MAX_FILE_SIZE_KB
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_tests: default_include_tests(),
            max_file_size_kb: default_max_file_size_kb(),
            languages: None,
            exclude_patterns: None,
            deep_analysis: false,
        }
    }
}

impl AnalysisOptions {
    /// Validate range constraints not expressible in the type system.
    ///
    /// # Errors
    /// Returns [`crate::Error::Validation`] if `max_file_size_kb` is outside
    /// `[1, 10000]`.
    pub fn validate(&self) -> crate::Result<()> {
        if !(MIN_MAX_FILE_SIZE_KB..=MAX_MAX_FILE_SIZE_KB).contains(&self.max_file_size_kb) {
            return Err(crate::Error::validation(format!(
                "maxFileSizeKB must be between {MIN_MAX_FILE_SIZE_KB} and {MAX_MAX_FILE_SIZE_KB}, got {}",
                self.max_file_size_kb
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let opts = AnalysisOptions::default();
        assert!(opts.include_tests);
        assert_eq!(opts.max_file_size_kb, 1000);
        assert!(opts.languages.is_none());
        assert!(!opts.deep_analysis);
    }

    #[test]
    fn rejects_zero_max_file_size() {
        let opts = AnalysisOptions {
            max_file_size_kb: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn accepts_minimum_max_file_size() {
        let opts = AnalysisOptions {
            max_file_size_kb: 1,
            ..Default::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn rejects_over_max() {
        let opts = AnalysisOptions {
            max_file_size_kb: 10_001,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }
}
