use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use super::dto::{SearchItem, SearchQuery, VideoInfoResponse};
use super::service::SearchService;
use crate::common::response::{ApiError, wants_json};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("q" = String, Query, description = "Search terms")
    ),
    responses(
        (status = 200, description = "Plain `id|title|thumb|channel` lines, or JSON when requested via Accept"),
        (status = 400, description = "Missing query", body = crate::common::response::ErrorBody),
        (status = 502, description = "Data API degraded", body = crate::common::response::ErrorBody)
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or("");
    if q.is_empty() {
        return Err(ApiError::BadRequest("missing query parameter q".to_string()));
    }

    let items = SearchService::search(&state, q).await?;

    if wants_json(&headers) {
        return Ok(Json(json!({ "results": items })).into_response());
    }
    let lines: Vec<String> = items.iter().map(SearchItem::as_line).collect();
    Ok(lines.join("\n").into_response())
}

#[utoipa::path(
    get,
    path = "/api/stream-info/{id}",
    params(
        ("id" = String, Path, description = "YouTube video ID")
    ),
    responses(
        (status = 200, description = "Video metadata", body = VideoInfoResponse),
        (status = 404, description = "Video not found", body = crate::common::response::ErrorBody),
        (status = 502, description = "Data API degraded", body = crate::common::response::ErrorBody)
    ),
    tag = "Search"
)]
pub async fn stream_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VideoInfoResponse>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest("missing video id".to_string()));
    }
    let info = SearchService::video_info(&state, &id).await?;
    Ok(Json(info))
}
