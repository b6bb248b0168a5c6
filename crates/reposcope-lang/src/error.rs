//! Language support errors.

use thiserror::Error;

/// Language-support error types.
#[derive(Error, Debug)]
pub enum LanguageError {
    /// Language could not be detected for a file.
    #[error("could not detect language for file: {path}")]
    DetectionFailed {
        /// Path that could not be detected.
        path: String,
    },

    /// Parsing failed internally (caught, never surfaced to the pipeline
    /// per the spec's best-effort contract; kept for lower-level callers).
    #[error("failed to parse {path}: {reason}")]
    ParseFailed {
        /// Path that failed to parse.
        path: String,
        /// Reason for the failure.
        reason: String,
    },

    /// IO error reading file content.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for language-support operations.
pub type Result<T> = std::result::Result<T, LanguageError>;
