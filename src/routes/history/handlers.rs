use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::common::AppState;
use crate::error::AppResult;
use crate::service;
use crate::service::history::DEFAULT_PAGE_SIZE;

use super::types::{HistoryListResponse, HistoryQuery, HistoryRecordResponse};

/// List history records, newest first
#[utoipa::path(
    get,
    path = "/api/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History retrieved successfully", body = HistoryListResponse),
    ),
    tag = "history"
)]
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<HistoryListResponse>> {
    let page = service::history::list_history(
        &*state.db,
        query.station_id,
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;

    Ok(Json(HistoryListResponse {
        count: page.count,
        page: page.page,
        page_size: page.page_size,
        results: page
            .records
            .into_iter()
            .map(HistoryRecordResponse::from)
            .collect(),
    }))
}

/// Get a single history record
#[utoipa::path(
    get,
    path = "/api/history/{history_id}",
    params(
        ("history_id" = Uuid, Path, description = "History record UUID"),
    ),
    responses(
        (status = 200, description = "History record retrieved successfully", body = HistoryRecordResponse),
        (status = 404, description = "History record not found"),
    ),
    tag = "history"
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(history_id): Path<Uuid>,
) -> AppResult<Json<HistoryRecordResponse>> {
    let record = service::history::get_history(&*state.db, history_id).await?;

    Ok(Json(HistoryRecordResponse::from(record)))
}
