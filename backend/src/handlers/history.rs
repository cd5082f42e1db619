//! Analysis history HTTP handlers
//!
//! Extractor rejections are taken as `Result` so malformed ids, query
//! strings and bodies answer with the JSON error body.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use shared::PaginatedResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::history::{
    CreateHistoryInput, HistoryEntry, HistoryQuery, HistoryService, UpdateHistoryInput,
};
use crate::AppState;

/// List saved analyses
pub async fn list_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<PaginatedResponse<HistoryEntry>>> {
    let Query(query) = query?;
    let service = HistoryService::new(state.db.clone());

    Ok(Json(service.list(&query).await?))
}

/// Save an analysis
pub async fn create_history(
    State(state): State<AppState>,
    payload: Result<Json<CreateHistoryInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<HistoryEntry>)> {
    let Json(input) = payload?;
    let service = HistoryService::new(state.db.clone());

    let entry = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Get a saved analysis
pub async fn get_history(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<HistoryEntry>> {
    let Path(id) = id?;
    let service = HistoryService::new(state.db.clone());

    Ok(Json(service.get(id).await?))
}

/// Update tags or notes of a saved analysis
pub async fn update_history(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateHistoryInput>, JsonRejection>,
) -> AppResult<Json<HistoryEntry>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let service = HistoryService::new(state.db.clone());

    Ok(Json(service.update(id, input).await?))
}

/// Delete a saved analysis
pub async fn delete_history(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    let service = HistoryService::new(state.db.clone());

    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Distinct tags in use
pub async fn list_history_tags(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let service = HistoryService::new(state.db.clone());

    Ok(Json(service.tags().await?))
}

/// Export matching analyses as CSV
pub async fn export_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query?;
    let service = HistoryService::new(state.db.clone());

    let csv = service.export_csv(&query).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"water-analysis-history.csv\"",
            ),
        ],
        csv,
    ))
}
