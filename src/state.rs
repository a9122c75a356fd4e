use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::modules::stream::cache::StreamCache;
use crate::modules::stream::resolver::Resolver;
use crate::modules::stream::transcoder::Transcoder;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http: reqwest::Client,
    pub cache: Arc<StreamCache>,
    pub resolver: Resolver,
    pub transcoder: Transcoder,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let cache = Arc::new(StreamCache::new(config.cache_dir.clone()));
        let resolver = Resolver::new(config.resolver_bin.clone(), config.resolve_timeout);
        let transcoder = Transcoder::new(config.transcoder_bin.clone(), config.transcode_timeout);

        Self {
            config,
            http: reqwest::Client::new(),
            cache,
            resolver,
            transcoder,
        }
    }
}
