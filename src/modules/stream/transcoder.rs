use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::time::timeout;
use tracing::debug;

use super::dto::StreamFormat;
use crate::common::response::ApiError;

/// Where the transcoded bytes go: the process stdout (live path) or a
/// file on scratch storage (cached path).
pub enum Sink {
    Pipe,
    File(PathBuf),
}

/// Launches the external transcoder with a fixed per-format argument set.
#[derive(Clone)]
pub struct Transcoder {
    bin: String,
    file_timeout: Duration,
}

impl Transcoder {
    pub fn new(bin: String, file_timeout: Duration) -> Self {
        Self { bin, file_timeout }
    }

    /// `launch(directURL, format, sink) -> TranscodeProcess`. Spawns one
    /// process and returns immediately; completion is observed through the
    /// handle. Dropping the handle kills the child.
    pub fn launch(
        &self,
        direct_url: &str,
        format: StreamFormat,
        sink: Sink,
    ) -> Result<TranscodeProcess, ApiError> {
        let args = transcode_args(direct_url, format, &sink);
        debug!("launching {} {}", self.bin, args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(match sink {
                Sink::Pipe => Stdio::piped(),
                Sink::File(_) => Stdio::null(),
            })
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|err| {
            ApiError::TranscodeFailed(format!("{} failed to start: {err}", self.bin))
        })?;

        if let Some(stderr) = child.stderr.take() {
            let bin = self.bin.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("{bin}: {line}");
                }
            });
        }

        Ok(TranscodeProcess { child })
    }

    /// Transcode into `path` and wait for the process to finish within the
    /// configured window. Expiry kills the process.
    pub async fn transcode_to_file(
        &self,
        direct_url: &str,
        format: StreamFormat,
        path: PathBuf,
    ) -> Result<(), ApiError> {
        let process = self.launch(direct_url, format, Sink::File(path))?;
        process.wait_with_timeout(self.file_timeout).await
    }
}

/// A running transcoder bound to one source URL and one sink. Never reused
/// across requests; the child dies with the handle.
pub struct TranscodeProcess {
    child: Child,
}

impl TranscodeProcess {
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Exit status once the process finishes, for diagnostics.
    pub async fn exit_code(mut self) -> Option<i32> {
        self.child.wait().await.ok().and_then(|status| status.code())
    }

    pub async fn wait_with_timeout(mut self, limit: Duration) -> Result<(), ApiError> {
        match timeout(limit, self.child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(ApiError::TranscodeFailed(format!(
                "transcoder exited with {status}"
            ))),
            Ok(Err(err)) => Err(ApiError::TranscodeFailed(format!(
                "waiting for transcoder: {err}"
            ))),
            Err(_) => {
                let _ = self.child.start_kill();
                Err(ApiError::TranscodeFailed(format!(
                    "transcoder timed out after {limit:?}"
                )))
            }
        }
    }
}

/// The fixed argument set per (format, sink). Both formats downscale to
/// 320x240 at 20fps, the budget of the handheld decoder.
pub fn transcode_args(direct_url: &str, format: StreamFormat, sink: &Sink) -> Vec<String> {
    let mut args: Vec<String> = ["-i", direct_url, "-vf", "scale=320:240", "-r", "20"]
        .into_iter()
        .map(String::from)
        .collect();

    match format {
        StreamFormat::Mp4 => {
            args.extend(
                [
                    "-c:v",
                    "libx264",
                    "-profile:v",
                    "baseline",
                    "-preset",
                    "veryfast",
                    "-b:v",
                    "250k",
                    "-c:a",
                    "aac",
                    "-b:a",
                    "64k",
                ]
                .into_iter()
                .map(String::from),
            );
            // +faststart needs a seekable output, so a pipe gets the
            // fragmented variant instead.
            let movflags = match sink {
                Sink::Pipe => "frag_keyframe+empty_moov+faststart",
                Sink::File(_) => "+faststart",
            };
            args.extend(["-movflags", movflags, "-f", "mp4"].into_iter().map(String::from));
        }
        StreamFormat::ThreeGp => {
            args.extend(
                [
                    "-c:v", "mpeg4", "-b:v", "180k", "-c:a", "aac", "-b:a", "32k", "-f", "3gp",
                ]
                .into_iter()
                .map(String::from),
            );
        }
    }

    match sink {
        Sink::Pipe => args.push("pipe:1".to_string()),
        Sink::File(path) => {
            args.push("-y".to_string());
            args.push(path.display().to_string());
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mp4_pipe_args_are_fixed() {
        let args = transcode_args("https://cdn/v", StreamFormat::Mp4, &Sink::Pipe);
        let expected: Vec<&str> = vec![
            "-i",
            "https://cdn/v",
            "-vf",
            "scale=320:240",
            "-r",
            "20",
            "-c:v",
            "libx264",
            "-profile:v",
            "baseline",
            "-preset",
            "veryfast",
            "-b:v",
            "250k",
            "-c:a",
            "aac",
            "-b:a",
            "64k",
            "-movflags",
            "frag_keyframe+empty_moov+faststart",
            "-f",
            "mp4",
            "pipe:1",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn mp4_file_args_use_faststart_and_overwrite() {
        let sink = Sink::File(PathBuf::from("/cache/abc.mp4"));
        let args = transcode_args("https://cdn/v", StreamFormat::Mp4, &sink);
        assert!(args.windows(2).any(|w| w == ["-movflags", "+faststart"]));
        assert_eq!(&args[args.len() - 2..], ["-y", "/cache/abc.mp4"]);
    }

    #[test]
    fn threegp_args_use_low_complexity_codec() {
        let args = transcode_args("https://cdn/v", StreamFormat::ThreeGp, &Sink::Pipe);
        assert!(args.windows(2).any(|w| w == ["-c:v", "mpeg4"]));
        assert!(args.windows(2).any(|w| w == ["-b:v", "180k"]));
        assert!(args.windows(2).any(|w| w == ["-b:a", "32k"]));
        assert!(args.windows(2).any(|w| w == ["-f", "3gp"]));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn both_formats_share_the_handheld_budget() {
        for format in [StreamFormat::Mp4, StreamFormat::ThreeGp] {
            let args = transcode_args("u", format, &Sink::Pipe);
            assert!(args.windows(2).any(|w| w == ["-vf", "scale=320:240"]));
            assert!(args.windows(2).any(|w| w == ["-r", "20"]));
        }
    }
}
