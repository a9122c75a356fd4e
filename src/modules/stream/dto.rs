use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Output profiles the handheld can decode. Each maps to exactly one
/// fixed transcoder argument set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    Mp4,
    #[serde(rename = "3gp")]
    ThreeGp,
}

impl StreamFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StreamFormat::Mp4 => "mp4",
            StreamFormat::ThreeGp => "3gp",
        }
    }

    /// Content type follows the requested format, never file inspection.
    pub fn content_type(self) -> &'static str {
        match self {
            StreamFormat::Mp4 => "video/mp4",
            StreamFormat::ThreeGp => "video/3gpp",
        }
    }
}

impl FromStr for StreamFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp4" => Ok(StreamFormat::Mp4),
            "3gp" => Ok(StreamFormat::ThreeGp),
            _ => Err(()),
        }
    }
}

/// Query parameters of the stream endpoint. `format` stays a raw string
/// here so an unknown value becomes our BadRequest envelope instead of an
/// axum rejection.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub format: Option<String>,
    pub cached: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_known_values_only() {
        assert_eq!("mp4".parse::<StreamFormat>(), Ok(StreamFormat::Mp4));
        assert_eq!("3gp".parse::<StreamFormat>(), Ok(StreamFormat::ThreeGp));
        assert!("avi".parse::<StreamFormat>().is_err());
        assert!("MP4".parse::<StreamFormat>().is_err());
    }

    #[test]
    fn format_maps_to_extension_and_content_type() {
        assert_eq!(StreamFormat::Mp4.extension(), "mp4");
        assert_eq!(StreamFormat::Mp4.content_type(), "video/mp4");
        assert_eq!(StreamFormat::ThreeGp.extension(), "3gp");
        assert_eq!(StreamFormat::ThreeGp.content_type(), "video/3gpp");
    }
}
