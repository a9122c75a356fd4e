use std::time::Duration;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::time::timeout;
use tokio_util::io::ReaderStream;
use tracing::info;

use super::dto::StreamFormat;
use super::range;
use super::transcoder::Sink;
use crate::common::response::ApiError;
use crate::state::AppState;

/// Window for the transcoder to produce its first bytes on the live path.
/// The whole stream is deliberately unbounded; long videos take as long
/// as they take, and disconnect or EOF ends the process.
const FIRST_CHUNK_WINDOW: Duration = Duration::from_secs(20);

pub struct StreamService;

impl StreamService {
    /// Live path: resolve, transcode to a pipe, and pass the bytes through
    /// as they are produced. The response is committed only after the
    /// first chunk arrives, so early process death still gets a proper
    /// error status.
    pub async fn live(
        state: AppState,
        id: &str,
        format: StreamFormat,
    ) -> Result<Response, ApiError> {
        let direct_url = state.resolver.resolve(id).await?;
        let mut process = state.transcoder.launch(&direct_url, format, Sink::Pipe)?;
        let stdout = process
            .take_stdout()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("transcoder stdout not piped")))?;
        let mut stream = ReaderStream::new(stdout);

        let first = match timeout(FIRST_CHUNK_WINDOW, stream.next()).await {
            Ok(Some(Ok(chunk))) => chunk,
            Ok(Some(Err(err))) => {
                return Err(ApiError::TranscodeFailed(format!(
                    "reading transcoder output: {err}"
                )));
            }
            Ok(None) => {
                let code = process.exit_code().await;
                return Err(ApiError::TranscodeFailed(format!(
                    "transcoder produced no output, exit code {code:?}"
                )));
            }
            Err(_) => {
                return Err(ApiError::TranscodeFailed(format!(
                    "no transcoder output within {FIRST_CHUNK_WINDOW:?}"
                )));
            }
        };

        info!("streaming {id} live as {}", format.extension());

        // The body owns the child: when the client disconnects the stream
        // is dropped and kill_on_drop takes the process down with it.
        let rest = stream.map(move |chunk| {
            let _owner = &process;
            chunk
        });
        let first = futures_util::stream::iter([Ok::<Bytes, std::io::Error>(first)]);
        let body = Body::from_stream(first.chain(rest));

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, format.content_type())
            .header(header::CACHE_CONTROL, "no-cache")
            .body(body)
            .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))
    }

    /// Cached path: serve the committed file if it exists, otherwise
    /// transcode into the cache under the per-key lease and then serve
    /// with range support.
    pub async fn cached(
        state: AppState,
        id: &str,
        format: StreamFormat,
        range_header: Option<&str>,
    ) -> Result<Response, ApiError> {
        if let Some(path) = state.cache.lookup(id, format).await {
            return range::serve_file(&path, format.content_type(), range_header).await;
        }

        // The fill runs detached so a disconnecting client cannot abort a
        // transcode other requesters may be waiting on.
        let cache = state.cache.clone();
        let resolver = state.resolver.clone();
        let transcoder = state.transcoder.clone();
        let owned_id = id.to_string();
        let fill_id = owned_id.clone();
        let fill = tokio::spawn(async move {
            cache
                .get_or_fill(&owned_id, format, move |part| async move {
                    let direct_url = resolver.resolve(&fill_id).await?;
                    transcoder.transcode_to_file(&direct_url, format, part).await
                })
                .await
        });

        let path = fill
            .await
            .map_err(|err| ApiError::Internal(anyhow::anyhow!("cache fill task died: {err}")))??;
        range::serve_file(&path, format.content_type(), range_header).await
    }
}
