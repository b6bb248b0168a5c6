//! Language detection: extension map -> shebang -> content heuristic ->
//! unknown, per the spec's resolution order.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use reposcope_domain::ports::{Confidence, DetectionBasis, DetectionResult, CONTENT_SNIFF_CAP_BYTES};

use crate::language::{LanguageId, LanguageRegistry};

/// One content-heuristic candidate: a language, its recognizing patterns,
/// and the minimum number of distinct patterns that must match for the
/// candidate to be considered.
struct HeuristicCandidate {
    language: LanguageId,
    patterns: &'static [&'static str],
    min_matches: usize,
}

const HEURISTIC_CANDIDATES: &[HeuristicCandidate] = &[
    HeuristicCandidate {
        language: LanguageId::TypeScript,
        patterns: &[
            r"\binterface\s+\w+",
            r":\s*(string|number|boolean|void|any)\b",
            r"\bimport\s+type\b",
            r"\bexport\s+(default\s+)?(class|function|interface|const)\b",
        ],
        min_matches: 2,
    },
    HeuristicCandidate {
        language: LanguageId::JavaScript,
        patterns: &[
            r"\bfunction\s*\w*\s*\(",
            r"\bconst\s+\w+\s*=",
            r"\brequire\(",
            r"=>\s*\{",
        ],
        min_matches: 2,
    },
    HeuristicCandidate {
        language: LanguageId::Python,
        patterns: &[
            r"(?m)^\s*def\s+\w+\s*\(",
            r"(?m)^\s*import\s+\w+",
            r"(?m)^\s*from\s+\w+\s+import\b",
            r"(?m)^\s*class\s+\w+",
        ],
        min_matches: 2,
    },
    HeuristicCandidate {
        language: LanguageId::Rust,
        patterns: &[r"\bfn\s+\w+\s*\(", r"\blet\s+mut\b", r"\buse\s+\w+::", r"->\s*\w+\s*\{"],
        min_matches: 2,
    },
    HeuristicCandidate {
        language: LanguageId::Go,
        patterns: &[r"\bfunc\s+\w+\s*\(", r"\bpackage\s+\w+", r"\bimport\s*\("],
        min_matches: 2,
    },
    HeuristicCandidate {
        language: LanguageId::Java,
        patterns: &[
            r"\bpublic\s+class\s+\w+",
            r"\bpackage\s+[\w.]+;",
            r"\bimport\s+[\w.]+;",
        ],
        min_matches: 2,
    },
];

fn compiled_patterns() -> &'static Vec<Vec<Regex>> {
    static COMPILED: OnceLock<Vec<Vec<Regex>>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        HEURISTIC_CANDIDATES
            .iter()
            .map(|candidate| {
                candidate
                    .patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("heuristic pattern must compile"))
                    .collect()
            })
            .collect()
    })
}

/// Detects a file's language by extension, shebang, then content
/// heuristic, falling back to `unknown`.
pub struct LanguageDetector {
    registry: LanguageRegistry,
}

impl LanguageDetector {
    /// Build a detector over the default [`LanguageRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: LanguageRegistry::new(),
        }
    }

    /// Detect the language of `path`, optionally sampling `content_head`
    /// (capped internally to [`CONTENT_SNIFF_CAP_BYTES`]) for shebang and
    /// content-heuristic detection.
    #[must_use]
    pub fn detect(&self, path: &Path, content_head: Option<&[u8]>) -> DetectionResult {
        if let Some(ext) = path.extension() {
            if let Some(lang) = self.registry.by_extension(&ext.to_string_lossy()) {
                return DetectionResult {
                    language: lang.tag().to_owned(),
                    confidence: Confidence::High,
                    basis: DetectionBasis::Extension,
                };
            }
        }

        if let Some(content) = content_head {
            let sample = &content[..content.len().min(CONTENT_SNIFF_CAP_BYTES)];
            if let Some(lang) = self.detect_shebang(sample) {
                return DetectionResult {
                    language: lang.tag().to_owned(),
                    confidence: Confidence::High,
                    basis: DetectionBasis::Shebang,
                };
            }

            if let Some(lang) = self.detect_heuristic(sample) {
                return DetectionResult {
                    language: lang.tag().to_owned(),
                    confidence: Confidence::Medium,
                    basis: DetectionBasis::Content,
                };
            }
        }

        DetectionResult {
            language: "unknown".to_owned(),
            confidence: Confidence::Low,
            basis: DetectionBasis::Unknown,
        }
    }

    fn detect_shebang(&self, sample: &[u8]) -> Option<LanguageId> {
        let first_line = sample
            .split(|&b| b == b'\n')
            .next()
            .and_then(|line| std::str::from_utf8(line).ok())?;
        let shebang = first_line.strip_prefix("#!")?;
        let interpreter = shebang
            .rsplit('/')
            .next()
            .unwrap_or(shebang)
            .split_whitespace()
            .next()
            .unwrap_or("");
        let interpreter = interpreter
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .trim_end_matches('2')
            .trim_end_matches('3');
        self.registry.by_shebang_interpreter(interpreter)
    }

    fn detect_heuristic(&self, sample: &[u8]) -> Option<LanguageId> {
        let text = std::str::from_utf8(sample).ok()?;
        let compiled = compiled_patterns();

        let mut best: Option<(LanguageId, f64)> = None;
        for (candidate, patterns) in HEURISTIC_CANDIDATES.iter().zip(compiled.iter()) {
            let matches = patterns.iter().filter(|re| re.is_match(text)).count();
            if matches < candidate.min_matches {
                continue;
            }
            let ratio = matches as f64 / patterns.len() as f64;
            if best.is_none_or(|(_, best_ratio)| ratio > best_ratio) {
                best = Some((candidate.language, ratio));
            }
        }
        best.map(|(lang, _)| lang)
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_detection_wins_over_content() {
        let detector = LanguageDetector::new();
        let result = detector.detect(Path::new("main.rs"), Some(b"def foo(): pass"));
        assert_eq!(result.language, "rust");
        assert_eq!(result.basis, DetectionBasis::Extension);
    }

    #[test]
    fn shebang_detects_python_without_extension() {
        let detector = LanguageDetector::new();
        let result = detector.detect(
            Path::new("run_script"),
            Some(b"#!/usr/bin/env python3\nprint('hi')\n"),
        );
        assert_eq!(result.language, "python");
        assert_eq!(result.basis, DetectionBasis::Shebang);
    }

    #[test]
    fn content_heuristic_detects_typescript() {
        let detector = LanguageDetector::new();
        let content =
            b"interface Foo { a: string }\nexport default class Bar implements Foo {}\n";
        let result = detector.detect(Path::new("noext"), Some(content));
        assert_eq!(result.language, "typescript");
        assert_eq!(result.basis, DetectionBasis::Content);
    }

    #[test]
    fn unrecognized_content_is_unknown() {
        let detector = LanguageDetector::new();
        let result = detector.detect(Path::new("README"), Some(b"just some prose text"));
        assert_eq!(result.language, "unknown");
        assert_eq!(result.basis, DetectionBasis::Unknown);
    }

    #[test]
    fn no_extension_no_content_is_unknown() {
        let detector = LanguageDetector::new();
        let result = detector.detect(Path::new("Makefile"), None);
        assert_eq!(result.language, "unknown");
    }
}
