//! `DELETE /analysis/:id`.

use axum::extract::{Path, State};
use axum::Json;
use reposcope_application::use_cases::query_analysis::QueryAnalysisUseCase;
use reposcope_domain::Error;

use crate::dto::DeleteResponse;
use crate::error_mapping::ApiError;
use crate::state::AppState;

use super::parse_id;

pub async fn handle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let parsed = parse_id(&id).map_err(|err| ApiError::new(err, state.config.node_env))?;
    let use_case = QueryAnalysisUseCase::new(state.services.clone());
    let deleted = use_case
        .delete(parsed)
        .await
        .map_err(|err| ApiError::new(err, state.config.node_env))?;

    if !deleted {
        return Err(ApiError::new(
            Error::not_found(format!("analysis {id} not found")),
            state.config.node_env,
        ));
    }

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("analysis {id} deleted"),
    }))
}
