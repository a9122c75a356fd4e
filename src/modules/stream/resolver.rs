use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error};

use crate::common::response::ApiError;

/// Resolves a video id to a direct, short-lived media URL by invoking the
/// external resolver binary. Stateless; exactly one attempt per call.
#[derive(Clone)]
pub struct Resolver {
    bin: String,
    timeout: Duration,
}

impl Resolver {
    pub fn new(bin: String, timeout: Duration) -> Self {
        Self { bin, timeout }
    }

    /// `resolve(videoID) -> DirectSourceURL`. Empty output means the video
    /// is not playable (404 class); a spawn error or timeout is an internal
    /// failure (500 class).
    pub async fn resolve(&self, video_id: &str) -> Result<String, ApiError> {
        // The id is validated to a safe segment before it gets here.
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("resolving {watch_url}");

        let mut cmd = Command::new(&self.bin);
        cmd.args(["-f", "best", "-g", &watch_url])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                return Err(ApiError::ResolverFailed(format!(
                    "{} failed to start: {err}",
                    self.bin
                )));
            }
            Err(_) => {
                return Err(ApiError::ResolverFailed(format!(
                    "{} timed out after {:?}",
                    self.bin, self.timeout
                )));
            }
        };

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!("{}: {}", self.bin, line);
        }

        match direct_url(&output.stdout) {
            Some(url) => Ok(url),
            None => {
                error!(
                    "no direct url for {video_id}, resolver exit: {:?}",
                    output.status.code()
                );
                Err(ApiError::VideoNotPlayable)
            }
        }
    }
}

/// Trimmed resolver stdout, if non-empty.
fn direct_url(stdout: &[u8]) -> Option<String> {
    let trimmed = String::from_utf8_lossy(stdout).trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}
