use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::dto::{SearchItem, Thumbnails, VideoInfoResponse};
use crate::common::response::ApiError;
use crate::state::AppState;

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";
const MAX_RESULTS: &str = "8";

// Data API wire shapes, reduced to the fields this service reads.

#[derive(Debug, Deserialize)]
struct YtSearchResponse {
    #[serde(default)]
    items: Vec<YtSearchItem>,
}

#[derive(Debug, Deserialize)]
struct YtSearchItem {
    #[serde(default)]
    id: YtSearchId,
    #[serde(default)]
    snippet: YtSnippet,
}

#[derive(Debug, Default, Deserialize)]
struct YtSearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YtSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "channelTitle")]
    channel_title: String,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct YtVideosResponse {
    #[serde(default)]
    items: Vec<YtVideoItem>,
}

#[derive(Debug, Deserialize)]
struct YtVideoItem {
    #[serde(default)]
    snippet: YtSnippet,
    #[serde(default, rename = "contentDetails")]
    content_details: YtContentDetails,
    #[serde(default)]
    statistics: YtStatistics,
}

#[derive(Debug, Default, Deserialize)]
struct YtContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YtStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
}

pub struct SearchService;

impl SearchService {
    pub async fn search(state: &AppState, q: &str) -> Result<Vec<SearchItem>, ApiError> {
        let url = Url::parse_with_params(
            SEARCH_ENDPOINT,
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", MAX_RESULTS),
                ("q", q),
                ("key", state.config.youtube_api_key.as_str()),
            ],
        )
        .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?;

        let data: YtSearchResponse = fetch_json(state, url, "search").await?;
        Ok(search_items(data))
    }

    pub async fn video_info(state: &AppState, id: &str) -> Result<VideoInfoResponse, ApiError> {
        let url = Url::parse_with_params(
            VIDEOS_ENDPOINT,
            &[
                ("part", "snippet,contentDetails,statistics"),
                ("id", id),
                ("key", state.config.youtube_api_key.as_str()),
            ],
        )
        .map_err(|err| ApiError::Internal(anyhow::Error::new(err)))?;

        let data: YtVideosResponse = fetch_json(state, url, "videos").await?;
        let item = data
            .items
            .into_iter()
            .next()
            .ok_or(ApiError::VideoNotPlayable)?;
        Ok(video_info(id, item))
    }
}

async fn fetch_json<T: for<'de> Deserialize<'de>>(
    state: &AppState,
    url: Url,
    what: &str,
) -> Result<T, ApiError> {
    debug!("fetching {what} from the data api");
    let response = state
        .http
        .get(url)
        .send()
        .await
        .map_err(|err| ApiError::Upstream(format!("{what} request failed: {err}")))?;
    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "{what} returned {}",
            response.status()
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Upstream(format!("{what} returned invalid json: {err}")))
}

fn search_items(data: YtSearchResponse) -> Vec<SearchItem> {
    data.items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            Some(SearchItem {
                id,
                // Newlines would break the one-result-per-line protocol.
                title: item.snippet.title.replace('\n', " "),
                channel_title: item.snippet.channel_title,
                thumbnails: item.snippet.thumbnails,
            })
        })
        .collect()
}

fn video_info(id: &str, item: YtVideoItem) -> VideoInfoResponse {
    VideoInfoResponse {
        id: id.to_string(),
        title: Some(item.snippet.title).filter(|t| !t.is_empty()),
        description: item.snippet.description,
        channel_title: Some(item.snippet.channel_title).filter(|c| !c.is_empty()),
        published_at: item.snippet.published_at,
        thumbnails: item.snippet.thumbnails,
        duration: item.content_details.duration,
        view_count: item.statistics.view_count,
        like_count: item.statistics.like_count,
        stream_endpoint: format!("/api/stream/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_payload_maps_to_items_and_lines() {
        let json = r#"{"items":[
            {"id":{"videoId":"abc123"},
             "snippet":{"title":"First\nLine","channelTitle":"Chan",
                        "thumbnails":{"default":{"url":"http://t/1.jpg","width":120,"height":90}}}},
            {"id":{"kind":"youtube#channel"},
             "snippet":{"title":"no video id","channelTitle":"X"}}
        ]}"#;
        let data: YtSearchResponse = serde_json::from_str(json).unwrap();
        let items = search_items(data);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_line(), "abc123|First Line|http://t/1.jpg|Chan");
    }

    #[test]
    fn missing_thumbnail_renders_an_empty_column() {
        let json = r#"{"items":[{"id":{"videoId":"abc"},"snippet":{"title":"T","channelTitle":"C"}}]}"#;
        let data: YtSearchResponse = serde_json::from_str(json).unwrap();
        let items = search_items(data);
        assert_eq!(items[0].as_line(), "abc|T||C");
    }

    #[test]
    fn videos_payload_maps_to_info() {
        let json = r#"{"items":[
            {"snippet":{"title":"A Video","description":"Desc","channelTitle":"Chan",
                        "publishedAt":"2025-10-10T00:00:00Z",
                        "thumbnails":{"default":{"url":"http://t/1.jpg"}}},
             "contentDetails":{"duration":"PT3M15S"},
             "statistics":{"viewCount":"1234","likeCount":"56"}}
        ]}"#;
        let data: YtVideosResponse = serde_json::from_str(json).unwrap();
        let info = video_info("abc", data.items.into_iter().next().unwrap());

        assert_eq!(info.id, "abc");
        assert_eq!(info.title.as_deref(), Some("A Video"));
        assert_eq!(info.duration.as_deref(), Some("PT3M15S"));
        assert_eq!(info.view_count.as_deref(), Some("1234"));
        assert_eq!(info.stream_endpoint, "/api/stream/abc");
    }

    #[test]
    fn empty_items_means_not_playable() {
        let data: YtVideosResponse = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(data.items.is_empty());
    }
}
