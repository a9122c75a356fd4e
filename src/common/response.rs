use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Wire shape of every error payload: a stable numeric code, the HTTP
/// status it ships with, and a short message. Raw process output and
/// stack traces never reach the client.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: u16,
    pub http: u16,
    pub msg: String,
}

/// One variant per failure class the proxy can report. The numeric codes
/// are part of the client contract and must not change between releases.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request / missing params")]
    BadRequest(String),
    #[error("Video not playable / not found")]
    VideoNotPlayable,
    #[error("YouTube API quota exceeded or bad response")]
    Upstream(String),
    #[error("Transcode process failed")]
    TranscodeFailed(String),
    #[error("Resolver process failed")]
    ResolverFailed(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
    #[error("Not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Upstream(_) => 1001,
            ApiError::VideoNotPlayable => 1002,
            ApiError::TranscodeFailed(_) => 2001,
            ApiError::BadRequest(_) => 3001,
            ApiError::RouteNotFound => 4040,
            ApiError::ResolverFailed(_) | ApiError::Internal(_) => 5001,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::VideoNotPlayable | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TranscodeFailed(_) | ApiError::ResolverFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Diagnostic detail stays server-side.
        match &self {
            ApiError::Internal(source) => error!("internal error: {source:#}"),
            ApiError::BadRequest(detail)
            | ApiError::Upstream(detail)
            | ApiError::TranscodeFailed(detail)
            | ApiError::ResolverFailed(detail) => error!("{self}: {detail}"),
            ApiError::VideoNotPlayable | ApiError::RouteNotFound => {}
        }

        let body = ErrorBody {
            code: self.code(),
            http: self.status().as_u16(),
            msg: self.to_string(),
        };
        (self.status(), Json(json!({ "error": body }))).into_response()
    }
}

/// The handheld client reads pipe-delimited plain text by default; JSON
/// is opt-in via the Accept header.
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(mime::APPLICATION_JSON.essence_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ApiError::Upstream(String::new()).code(), 1001);
        assert_eq!(ApiError::VideoNotPlayable.code(), 1002);
        assert_eq!(ApiError::TranscodeFailed(String::new()).code(), 2001);
        assert_eq!(ApiError::BadRequest(String::new()).code(), 3001);
        assert_eq!(ApiError::RouteNotFound.code(), 4040);
        assert_eq!(ApiError::ResolverFailed(String::new()).code(), 5001);
        assert_eq!(ApiError::Internal(anyhow::anyhow!("boom")).code(), 5001);
    }

    #[test]
    fn error_statuses_match_taxonomy() {
        assert_eq!(
            ApiError::Upstream(String::new()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(ApiError::VideoNotPlayable.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::BadRequest(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::TranscodeFailed(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ResolverFailed(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::RouteNotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn accept_header_switches_to_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/plain"));
        assert!(!wants_json(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(wants_json(&headers));
    }
}
