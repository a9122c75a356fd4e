use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json};
use serde_json::json;

use super::dto::{HealthResponse, UpdateEntry};
use crate::common::response::wants_json;

pub const SERVICE_NAME: &str = "youtube-dsi-proxy";

const UPDATE_LOG: &[UpdateEntry] = &[
    UpdateEntry {
        version: "1.2.0",
        date: "2025-10-22",
        notes: "Thumbnails + full video metadata, update log visible in app.",
    },
    UpdateEntry {
        version: "1.1.0",
        date: "2025-10-18",
        notes: "Live streaming via yt-dlp + ffmpeg; DSi-friendly output.",
    },
    UpdateEntry {
        version: "1.0.0",
        date: "2025-10-10",
        notes: "Initial proxy: search, stream, stream-info.",
    },
];

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "Meta"
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[utoipa::path(
    get,
    path = "/api/update-log",
    responses(
        (status = 200, description = "Changelog as plain lines, or JSON when requested via Accept")
    ),
    tag = "Meta"
)]
pub async fn update_log(headers: HeaderMap) -> impl IntoResponse {
    if wants_json(&headers) {
        return Json(json!({ "updateLog": UPDATE_LOG })).into_response();
    }

    let lines: Vec<String> = UPDATE_LOG
        .iter()
        .map(|u| format!("{}|{}|{}", u.version, u.date, u.notes))
        .collect();
    lines.join("\n").into_response()
}
