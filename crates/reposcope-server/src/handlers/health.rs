//! `GET /health`: best-effort reachability probe of every backing
//! dependency, never failing the request itself - a down dependency is
//! reported in the body with a `503`, not a handler error.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use reposcope_domain::ports::ListQuery;
use reposcope_domain::value_objects::AnalysisId;

use crate::dto::{HealthResponse, HealthServices};
use crate::state::AppState;

pub async fn handle(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state
        .services
        .record_store
        .list(ListQuery {
            limit: 1,
            offset: 0,
            status: None,
        })
        .await
        .is_ok();

    let queue_reachable = state
        .services
        .job_queue
        .status(AnalysisId::new())
        .await
        .is_ok();
    // This deployment has a single queue backend (in-memory or Redis); a
    // separate `redis` probe only makes sense when Redis is configured.
    let redis = state.config.redis_host.is_none() || queue_reachable;

    let all_up = database && redis && queue_reachable;
    let status_code = if all_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if all_up { "ok" } else { "degraded" },
            timestamp: Utc::now(),
            services: HealthServices {
                database,
                redis,
                queue: queue_reachable,
            },
        }),
    )
}
