//! Language detection and structural source extraction.
//!
//! - [`detection`]: extension -> shebang -> content-heuristic detection.
//! - [`python`]: regex-scan structural extraction for Python.
//! - [`typescript`]: tree-sitter AST extraction for TypeScript/JavaScript.
//!
//! [`ParserService`] wires the three into the domain's [`SourceParser`]
//! port.

pub mod detection;
pub mod error;
pub mod language;
pub mod python;
pub mod typescript;

use std::path::Path;

use reposcope_domain::entities::ParsedFile;
use reposcope_domain::ports::{DetectionResult, SourceParser};

use crate::detection::LanguageDetector;
use crate::language::LanguageId;

/// [`SourceParser`] implementation backed by [`LanguageDetector`] plus the
/// Python and TypeScript/JavaScript extractors.
pub struct ParserService {
    detector: LanguageDetector,
}

impl ParserService {
    /// Build a parser service over the default language detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            detector: LanguageDetector::new(),
        }
    }
}

impl Default for ParserService {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for ParserService {
    fn detect(&self, path: &Path, content_head: Option<&[u8]>) -> DetectionResult {
        self.detector.detect(path, content_head)
    }

    fn is_parseable(&self, language: &str) -> bool {
        LanguageId::from_tag(language).is_some_and(|id| id.is_parseable())
    }

    fn parse(&self, relative_path: &str, language: &str, content: &str) -> Option<ParsedFile> {
        match language {
            "python" => Some(python::extract(relative_path, content)),
            "typescript" | "javascript" => {
                match typescript::extract(relative_path, language, content) {
                    Some(parsed) => Some(parsed),
                    None => {
                        tracing::warn!(path = relative_path, language, "failed to parse source");
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_language_returns_none() {
        let service = ParserService::new();
        assert_eq!(service.parse("a.rs", "rust", "fn main() {}"), None);
    }

    #[test]
    fn python_always_parses_to_some() {
        let service = ParserService::new();
        assert!(service.parse("a.py", "python", "def f(): pass").is_some());
    }

    #[test]
    fn is_parseable_matches_language_registry() {
        let service = ParserService::new();
        assert!(service.is_parseable("typescript"));
        assert!(!service.is_parseable("rust"));
        assert!(!service.is_parseable("bogus"));
    }
}
