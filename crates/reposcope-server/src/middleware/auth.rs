//! `x-api-key` boundary check (`spec.md` §6): a single middleware function
//! checked before routing, bypassed entirely when `API_KEY` is unset.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error_mapping::ApiError;
use crate::state::AppState;

const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests missing or presenting the wrong `x-api-key` header.
/// A no-op when `state.config.api_key` is `None` (development default).
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.config.api_key.as_deref() else {
        return next.run(request).await;
    };
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    match provided {
        Some(key) if key == expected => next.run(request).await,
        _ => ApiError::new(reposcope_domain::Error::Unauthorized, state.config.node_env).into_response(),
    }
}
