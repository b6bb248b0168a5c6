//! Global and strict rate limiting (`spec.md` §6), built directly on
//! `governor`'s keyed token-bucket limiter and composed as plain
//! `axum::middleware::from_fn_with_state` layers - the example pack's
//! `tower_governor` wrapper crate is not part of this workspace's
//! dependency set, so the limiter is driven by hand (see `DESIGN.md`).

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

use crate::error_mapping::ApiError;
use crate::state::AppState;

/// A token-bucket limiter keyed by client IP.
pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Build the global limiter from `RATE_LIMIT_WINDOW_MS`/`MAX_REQUESTS`.
#[must_use]
pub fn global_limiter(window_ms: u64, max_requests: u32) -> Arc<IpRateLimiter> {
    Arc::new(build_limiter(window_ms, max_requests))
}

/// Build the strict limiter applied only to `POST /analyze`: 10 per hour,
/// fixed per `spec.md` §6 (not configurable via environment).
#[must_use]
pub fn strict_limiter() -> Arc<IpRateLimiter> {
    Arc::new(build_limiter(60 * 60 * 1000, 10))
}

/// `n` per `window_ms`, approximated as governor's own docs recommend: a
/// burst capacity of `n` refilling at one token per `window_ms / n`.
fn build_limiter(window_ms: u64, max_requests: u32) -> IpRateLimiter {
    let burst = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
    let per_token_ms = (window_ms / u64::from(burst.get())).max(1);
    let quota = Quota::with_period(Duration::from_millis(per_token_ms))
        .unwrap_or_else(|| Quota::per_hour(burst))
        .allow_burst(burst);
    RateLimiter::keyed(quota)
}

fn client_ip(connect_info: Option<&ConnectInfo<SocketAddr>>) -> IpAddr {
    connect_info.map_or_else(|| IpAddr::from([0, 0, 0, 0]), |info| info.0.ip())
}

/// Global limiter middleware, applied to every route.
pub async fn global(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    check(&state, &state.global_limiter, connect_info.as_ref(), request, next).await
}

/// Strict limiter middleware, applied only to `POST /analyze`.
pub async fn strict(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    check(&state, &state.strict_limiter, connect_info.as_ref(), request, next).await
}

async fn check(
    state: &AppState,
    limiter: &IpRateLimiter,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(connect_info);
    match limiter.check_key(&ip) {
        Ok(()) => next.run(request).await,
        Err(_not_until) => ApiError::new(
            reposcope_domain::Error::rate_limited("rate limit exceeded"),
            state.config.node_env,
        )
        .into_response(),
    }
}
