//! Domain error taxonomy
//!
//! A single enum carries every failure category the rest of the workspace
//! needs. Each boundary (HTTP, queue, store) maps these variants to its own
//! representation rather than inventing a parallel taxonomy.

use thiserror::Error;

/// Result alias used throughout the domain and dependent crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Domain-wide error type.
///
/// Variants are grouped by the HTTP status they map to at the server
/// boundary (see `reposcope-server::error_mapping`), not by subsystem -
/// a caller should be able to tell the right response code from the
/// variant alone.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied input failed validation (maps to 400).
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of what failed validation.
        message: String,
    },

    /// Requested entity does not exist (maps to 404).
    #[error("not found: {message}")]
    NotFound {
        /// Description of the missing entity.
        message: String,
    },

    /// Missing or invalid API key (maps to 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Reserved for future use (maps to 403).
    #[error("forbidden: {message}")]
    Forbidden {
        /// Description of the forbidden action.
        message: String,
    },

    /// Reserved for future use, e.g. duplicate id (maps to 409).
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflicting state.
        message: String,
    },

    /// Rate limiter rejected the request (maps to 429).
    #[error("rate limited: {message}")]
    RateLimited {
        /// Which limiter fired (global or strict).
        message: String,
    },

    /// A remote dependency (VCS host, database, queue) is unreachable or
    /// returned a server error (maps to 503).
    #[error("service unavailable: {message}")]
    ServiceUnavailable {
        /// Description of the unavailable dependency.
        message: String,
    },

    /// Everything else (maps to 500, message redacted in production).
    #[error("internal error: {message}")]
    Internal {
        /// Internal description, not exposed verbatim in production.
        message: String,
    },

    /// I/O failure reading or writing the filesystem.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required configuration key was missing.
    #[error("missing configuration: {key}")]
    ConfigMissing {
        /// The environment variable name.
        key: String,
    },

    /// A configuration value was present but invalid.
    #[error("invalid configuration for {key}: {message}")]
    ConfigInvalid {
        /// The environment variable name.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    /// Version-control operation failed (clone, fetch, resolve).
    #[error("vcs error: {message}")]
    Vcs {
        /// Description of the VCS failure.
        message: String,
    },

    /// Persistence layer failure not otherwise classified above.
    #[error("database error: {message}")]
    Database {
        /// Description of the database failure.
        message: String,
    },

    /// Source parsing failure. Per the parser contract this should
    /// normally be swallowed and logged rather than propagated, but the
    /// variant exists for the cases (e.g. language registry misuse) where
    /// it must surface.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },
}

impl Error {
    /// Build a [`Error::Validation`] from any displayable message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build a [`Error::NotFound`] from any displayable message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Build a [`Error::ServiceUnavailable`] from any displayable message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Build a [`Error::Internal`] from any displayable message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Build a [`Error::Vcs`] from any displayable message.
    pub fn vcs(message: impl Into<String>) -> Self {
        Self::Vcs {
            message: message.into(),
        }
    }

    /// Build a [`Error::Database`] from any displayable message.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Build a [`Error::RateLimited`] from any displayable message.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// True if this error represents a caller mistake (4xx family) rather
    /// than a system fault (5xx family).
    #[must_use]
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotFound { .. }
                | Self::Unauthorized
                | Self::Forbidden { .. }
                | Self::Conflict { .. }
                | Self::RateLimited { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_fault_classification() {
        assert!(Error::validation("bad url").is_client_fault());
        assert!(Error::not_found("missing").is_client_fault());
        assert!(Error::Unauthorized.is_client_fault());
        assert!(!Error::internal("boom").is_client_fault());
        assert!(!Error::service_unavailable("down").is_client_fault());
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::other("disk full");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
