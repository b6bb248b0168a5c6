//! `GET /ping`: liveness probe, no dependency checks.

use axum::Json;
use chrono::Utc;

use crate::dto::PingResponse;

pub async fn handle() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong",
        timestamp: Utc::now(),
    })
}
