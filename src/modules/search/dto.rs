use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Thumbnails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnails: Thumbnails,
}

impl SearchItem {
    /// The `id|title|thumb_default|channel` line the handheld parses.
    pub fn as_line(&self) -> String {
        let thumb = self
            .thumbnails
            .default
            .as_ref()
            .map(|t| t.url.as_str())
            .unwrap_or("");
        format!("{}|{}|{}|{}", self.id, self.title, thumb, self.channel_title)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfoResponse {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    pub thumbnails: Thumbnails,
    /// ISO-8601 duration, e.g. PT3M15S.
    pub duration: Option<String>,
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    /// Where the player should point for the actual media.
    #[serde(rename = "stream_endpoint")]
    pub stream_endpoint: String,
}
