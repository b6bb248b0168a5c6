//! Cross-cutting axum middleware: auth boundary and rate limiting.

pub mod auth;
pub mod rate_limit;
