//! `GET /analysis/:id/status`.

use axum::extract::{Path, State};
use axum::Json;
use reposcope_application::use_cases::query_analysis::QueryAnalysisUseCase;

use crate::dto::StatusResponse;
use crate::error_mapping::ApiError;
use crate::state::AppState;

use super::parse_id;

pub async fn handle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_id(&id).map_err(|err| ApiError::new(err, state.config.node_env))?;
    let use_case = QueryAnalysisUseCase::new(state.services.clone());
    let view = use_case
        .status(id)
        .await
        .map_err(|err| ApiError::new(err, state.config.node_env))?;
    Ok(Json(StatusResponse::new(&view.record, view.progress)))
}
