//! Data file import handler.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use tracing::info;

use gatehouse_core::error::AppError;
use gatehouse_entity::ingest::ImportReport;

use crate::dto::request::ReadQuery;
use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/reader/read
pub async fn read(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ReadQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ImportReport>>, AppError> {
    let Query(query) =
        query.map_err(|_| AppError::bad_parameters("date must be formatted as YYYY-MM-DD"))?;

    info!(user_id = %auth.user_id, date = ?query.date, "Import requested");

    let report = match query.date {
        Some(date) => state.ingest_service.import_for(date).await?,
        None => state.ingest_service.import_today().await?,
    };
    Ok(Json(ApiResponse::ok(report)))
}
