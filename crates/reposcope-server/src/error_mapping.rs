//! Maps `reposcope_domain::Error` onto the single HTTP envelope from
//! `spec.md` §7: `{error, message, statusCode, details?, timestamp}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use reposcope_domain::Error;
use reposcope_infrastructure::config::NodeEnv;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(rename = "statusCode")]
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    timestamp: DateTime<Utc>,
}

/// A [`reposcope_domain::Error`] paired with whether its message should be
/// redacted (production only), since `IntoResponse` needs no further
/// lookups once this is built.
pub struct ApiError {
    error: Error,
    redact: bool,
}

impl ApiError {
    /// Build from a domain error and the server's configured environment.
    #[must_use]
    pub fn new(error: Error, node_env: NodeEnv) -> Self {
        Self {
            error,
            redact: matches!(node_env, NodeEnv::Production),
        }
    }
}

fn status_and_tag(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::Validation { .. } => (StatusCode::BAD_REQUEST, "ValidationError"),
        Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NotFoundError"),
        Error::Unauthorized => (StatusCode::UNAUTHORIZED, "UnauthorizedError"),
        Error::Forbidden { .. } => (StatusCode::FORBIDDEN, "ForbiddenError"),
        Error::Conflict { .. } => (StatusCode::CONFLICT, "ConflictError"),
        Error::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RateLimitedError"),
        Error::ServiceUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailableError")
        }
        Error::Io(_)
        | Error::Json(_)
        | Error::ConfigMissing { .. }
        | Error::ConfigInvalid { .. }
        | Error::Vcs { .. }
        | Error::Database { .. }
        | Error::Parse { .. }
        | Error::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, tag) = status_and_tag(&self.error);
        let message = if self.redact && status == StatusCode::INTERNAL_SERVER_ERROR {
            "an internal error occurred".to_owned()
        } else {
            self.error.to_string()
        };
        let body = ErrorBody {
            error: tag.to_owned(),
            message,
            status_code: status.as_u16(),
            details: None,
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let response =
            ApiError::new(Error::not_found("missing"), NodeEnv::Development).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn validation_error_tag_matches_spec_literal() {
        let response = ApiError::new(Error::validation("bad url"), NodeEnv::Development)
            .into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains(r#""error":"ValidationError""#));
    }

    #[tokio::test]
    async fn internal_message_redacted_in_production() {
        let response = ApiError::new(Error::internal("secret detail"), NodeEnv::Production)
            .into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("secret detail"));
    }

    #[tokio::test]
    async fn internal_message_kept_in_development() {
        let response = ApiError::new(Error::internal("secret detail"), NodeEnv::Development)
            .into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("secret detail"));
    }
}
