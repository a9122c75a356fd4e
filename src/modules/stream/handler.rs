use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::Response;

use super::cache::ensure_safe_id;
use super::dto::{StreamFormat, StreamQuery};
use super::service::StreamService;
use crate::common::response::ApiError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/stream/{id}",
    params(
        ("id" = String, Path, description = "YouTube video ID"),
        ("format" = Option<String>, Query, description = "mp4 (default) or 3gp"),
        ("cached" = Option<bool>, Query, description = "Transcode to the cache and serve with range support")
    ),
    responses(
        (status = 200, description = "Transcoded media bytes"),
        (status = 206, description = "Partial content from the cache"),
        (status = 400, description = "Missing or invalid id/format", body = crate::common::response::ErrorBody),
        (status = 404, description = "Video not playable", body = crate::common::response::ErrorBody),
        (status = 500, description = "Resolver or transcoder failure", body = crate::common::response::ErrorBody)
    ),
    tag = "Stream"
)]
pub async fn stream_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    // Everything here is validated before any external process is spawned.
    ensure_safe_id(&id)?;
    let format = match query.format.as_deref() {
        None => StreamFormat::Mp4,
        Some(raw) => raw
            .parse::<StreamFormat>()
            .map_err(|_| ApiError::BadRequest(format!("unknown format: {raw}")))?,
    };

    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    // A live pipe cannot honor ranges, so a Range header implies the
    // cached path.
    if query.cached.unwrap_or(false) || range_header.is_some() {
        StreamService::cached(state, &id, format, range_header).await
    } else {
        StreamService::live(state, &id, format).await
    }
}
