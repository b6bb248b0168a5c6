//! Route table (`spec.md` §6): every endpoint nested under
//! `/api/<API_VERSION>`, wrapped in the auth boundary and the global rate
//! limiter, with a second strict limiter applied only to `POST /analyze`.

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{auth, rate_limit};
use crate::state::AppState;

/// Build the full axum [`Router`] over `state`.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let version = state.config.api_version.clone();

    let analyze_route = post(handlers::analyze::handle).route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit::strict,
    ));

    let api = Router::new()
        .route("/health", get(handlers::health::handle))
        .route("/ping", get(handlers::ping::handle))
        .route("/analyze", analyze_route)
        .route("/analysis/{id}/status", get(handlers::status::handle))
        .route("/analysis/{id}/tree", get(handlers::tree::handle))
        .route("/analysis/{id}", delete(handlers::delete::handle))
        .route("/analyses", get(handlers::list::handle))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::global,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(TraceLayer::new_for_http());

    Router::new()
        .nest(&format!("/api/{version}"), api)
        .with_state(state)
}
