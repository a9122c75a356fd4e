use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use super::dto::StreamFormat;
use crate::common::response::ApiError;

/// On-disk cache of transcoded artifacts, keyed by (VideoID, StreamFormat).
/// Entries are never evicted. A per-key in-flight table guarantees at most
/// one transcode per key; concurrent requesters wait for the first fill
/// and then find the committed file.
pub struct StreamCache {
    dir: PathBuf,
    in_flight: Mutex<HashMap<(String, StreamFormat), Arc<AsyncMutex<()>>>>,
}

impl StreamCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn entry_path(&self, id: &str, format: StreamFormat) -> PathBuf {
        self.dir.join(format!("{id}.{}", format.extension()))
    }

    /// The committed file for this key, if one exists on disk.
    pub async fn lookup(&self, id: &str, format: StreamFormat) -> Option<PathBuf> {
        let path = self.entry_path(id, format);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }

    /// Return the cached file for the key, running `fill` to produce it on
    /// a miss. `fill` receives a temporary path and must leave the finished
    /// artifact there; commit renames it into place atomically.
    pub async fn get_or_fill<F, Fut>(
        &self,
        id: &str,
        format: StreamFormat,
        fill: F,
    ) -> Result<PathBuf, ApiError>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let lease = self.lease(id, format);
        let _guard = lease.lock().await;

        // Whoever queued behind the winning fill finds the file here.
        if let Some(path) = self.lookup(id, format).await {
            debug!("cache hit for {id}.{}", format.extension());
            return Ok(path);
        }

        let path = self.entry_path(id, format);
        let part = self.dir.join(format!("{id}.{}.part", format.extension()));
        info!("cache miss for {id}.{}, transcoding", format.extension());

        if let Err(err) = fill(part.clone()).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(err);
        }

        // A transcoder that exits cleanly without producing output is
        // still a transcode failure.
        match tokio::fs::try_exists(&part).await {
            Ok(true) => {}
            _ => {
                return Err(ApiError::TranscodeFailed(
                    "transcoder produced no output file".to_string(),
                ));
            }
        }

        tokio::fs::rename(&part, &path)
            .await
            .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?;
        Ok(path)
    }

    // One async mutex per key. The table grows with the cache itself and
    // is never pruned.
    fn lease(&self, id: &str, format: StreamFormat) -> Arc<AsyncMutex<()>> {
        let mut table = self.in_flight.lock().unwrap();
        table
            .entry((id.to_string(), format))
            .or_default()
            .clone()
    }
}

/// Video ids double as cache file names, so anything outside
/// alphanumeric, `-` and `_` is rejected before it reaches the
/// filesystem or a process argument.
pub fn ensure_safe_id(id: &str) -> Result<(), ApiError> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::BadRequest(format!("invalid video id: {id:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn safe_ids_pass_unsafe_ids_fail() {
        assert!(ensure_safe_id("dQw4w9WgXcQ").is_ok());
        assert!(ensure_safe_id("abc-DEF_123").is_ok());
        assert!(ensure_safe_id("").is_err());
        assert!(ensure_safe_id("../etc/passwd").is_err());
        assert!(ensure_safe_id("a/b").is_err());
        assert!(ensure_safe_id("a b").is_err());
    }

    #[test]
    fn entry_path_is_keyed_by_id_and_format() {
        let cache = StreamCache::new(PathBuf::from("/scratch"));
        assert_eq!(
            cache.entry_path("abc", StreamFormat::Mp4),
            PathBuf::from("/scratch/abc.mp4")
        );
        assert_eq!(
            cache.entry_path("abc", StreamFormat::ThreeGp),
            PathBuf::from("/scratch/abc.3gp")
        );
    }

    #[tokio::test]
    async fn fill_commits_atomically_and_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let cache = StreamCache::new(dir.path().to_path_buf());
        let fills = AtomicUsize::new(0);
        let fills = &fills;

        let path = cache
            .get_or_fill("abc", StreamFormat::Mp4, |part| async move {
                fills.fetch_add(1, Ordering::SeqCst);
                tokio::fs::write(&part, b"media").await.unwrap();
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"media");

        // Second request serves the committed file without re-transcoding.
        let again = cache
            .get_or_fill("abc", StreamFormat::Mp4, |_| async move {
                fills.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(again, path);
        assert_eq!(fills.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fill_without_output_is_a_transcode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cache = StreamCache::new(dir.path().to_path_buf());

        let err = cache
            .get_or_fill("abc", StreamFormat::Mp4, |_| async { Ok(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::TranscodeFailed(_)));
        assert!(cache.lookup("abc", StreamFormat::Mp4).await.is_none());
    }

    #[tokio::test]
    async fn failed_fill_leaves_no_entry_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cache = StreamCache::new(dir.path().to_path_buf());

        let err = cache
            .get_or_fill("abc", StreamFormat::Mp4, |part| async move {
                tokio::fs::write(&part, b"partial").await.unwrap();
                Err(ApiError::TranscodeFailed("boom".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::TranscodeFailed(_)));
        assert!(cache.lookup("abc", StreamFormat::Mp4).await.is_none());
        assert!(!dir.path().join("abc.mp4.part").exists());
    }

    #[tokio::test]
    async fn concurrent_requests_transcode_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(StreamCache::new(dir.path().to_path_buf()));
        let fills = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let fills = fills.clone();
            tasks.push(tokio::spawn(async move {
                cache
                    .get_or_fill("abc", StreamFormat::ThreeGp, move |part| async move {
                        fills.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        tokio::fs::write(&part, b"media").await.unwrap();
                        Ok(())
                    })
                    .await
            }));
        }

        for task in tasks {
            let path = task.await.unwrap().unwrap();
            assert_eq!(tokio::fs::read(&path).await.unwrap(), b"media");
        }
        assert_eq!(fills.load(Ordering::SeqCst), 1);
    }
}
