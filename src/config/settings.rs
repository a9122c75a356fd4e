use std::path::PathBuf;
use std::time::Duration;

use crate::config::env::{self, EnvKey};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub youtube_api_key: String,
    pub cache_dir: PathBuf,
    pub resolver_bin: String,
    pub transcoder_bin: String,
    pub resolve_timeout: Duration,
    pub transcode_timeout: Duration,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            youtube_api_key: env::get(EnvKey::YoutubeApiKey)?,
            cache_dir: PathBuf::from(env::get_or(EnvKey::CacheDir, "cache")),
            resolver_bin: env::get_or(EnvKey::ResolverBin, "yt-dlp"),
            transcoder_bin: env::get_or(EnvKey::TranscoderBin, "ffmpeg"),
            resolve_timeout: Duration::from_secs(env::get_parsed(EnvKey::ResolveTimeoutSecs, 30)),
            transcode_timeout: Duration::from_secs(env::get_parsed(
                EnvKey::TranscodeTimeoutSecs,
                600,
            )),
        })
    }
}
