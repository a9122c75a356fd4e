use std::io::SeekFrom;
use std::path::Path;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::common::response::ApiError;

/// Requested byte span before clamping: start and optional inclusive end.
/// Malformed syntax (including suffix ranges, which the handheld never
/// sends) yields `None` and falls back to full content rather than
/// failing the request.
pub fn parse_range(header: &str) -> Option<(u64, Option<u64>)> {
    let value = header.strip_prefix("bytes=")?;
    let (start, end) = value.split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = end.trim();
    let end = if end.is_empty() {
        None
    } else {
        Some(end.parse::<u64>().ok()?)
    };
    if end.is_some_and(|end| end < start) {
        return None;
    }
    Some((start, end))
}

/// Serve a file honoring byte ranges, independent of how it was produced.
/// Full content on no (or unparseable) Range header, 206 with an exact
/// `Content-Range` otherwise, 416 when the start lies beyond the file.
pub async fn serve_file(
    path: &Path,
    content_type: &'static str,
    range_header: Option<&str>,
) -> Result<Response, ApiError> {
    let mut file = File::open(path)
        .await
        .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?;
    let size = file
        .metadata()
        .await
        .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?
        .len();

    let response = match range_header.and_then(parse_range) {
        Some((start, _)) if start >= size => Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{size}"))
            .header(header::ACCEPT_RANGES, "bytes")
            .body(Body::empty()),
        Some((start, end)) => {
            let end = end.unwrap_or(size - 1).min(size - 1);
            let length = end - start + 1;
            file.seek(SeekFrom::Start(start))
                .await
                .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?;
            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_RANGE, format!("bytes {start}-{end}/{size}"))
                .header(header::CONTENT_LENGTH, length)
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::from_stream(ReaderStream::new(file.take(length))))
        }
        None => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, size)
            .header(header::ACCEPT_RANGES, "bytes")
            .body(Body::from_stream(ReaderStream::new(file))),
    };

    response.map_err(|err| ApiError::Internal(anyhow::Error::new(err)))
}
