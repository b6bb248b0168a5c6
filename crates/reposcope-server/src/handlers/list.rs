//! `GET /analyses?limit=&offset=&status=`.

use axum_extra::extract::Query;
use axum::extract::State;
use axum::Json;
use reposcope_application::use_cases::query_analysis::QueryAnalysisUseCase;
use reposcope_domain::Error;

use crate::dto::{AnalysesListResponse, AnalysisSummaryDto, ListAnalysesQuery};
use crate::error_mapping::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 20;
const MIN_LIMIT: u32 = 1;
const MAX_LIMIT: u32 = 100;

pub async fn handle(
    State(state): State<AppState>,
    Query(query): Query<ListAnalysesQuery>,
) -> Result<Json<AnalysesListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::new(
            Error::validation(format!(
                "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
            )),
            state.config.node_env,
        ));
    }
    let offset = query.offset.unwrap_or(0);

    let use_case = QueryAnalysisUseCase::new(state.services.clone());
    let page = use_case
        .list(limit, offset, query.status)
        .await
        .map_err(|err| ApiError::new(err, state.config.node_env))?;

    Ok(Json(AnalysesListResponse {
        analyses: page.records.iter().map(AnalysisSummaryDto::from).collect(),
        total: page.total,
        page: offset / limit.max(1) + 1,
    }))
}
