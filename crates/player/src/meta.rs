//! Head metadata for the player page: title, description, social tags and a
//! schema.org `VideoObject` document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::params::PlayerParams;

pub const SITE_SUFFIX: &str = "TeraBox Video Player | TeraBoxDownloaderPro";
pub const DESCRIPTION: &str = "Watch and download videos from TeraBox with our secure player. No login required, fast streaming and download options available.";
pub const KEYWORDS: &str = "terabox video player, terabox online player, terabox stream, watch terabox videos, terabox downloader, terabox streaming";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    /// `name` or `property`.
    pub attr: &'static str,
    pub key: &'static str,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub video_title: String,
    pub description: &'static str,
    pub thumbnail: Option<String>,
    pub embed_url: Option<String>,
    pub page_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeadDocument<'a> {
    pub title: &'a str,
    pub meta: Vec<MetaTag>,
    #[serde(rename = "jsonLd")]
    pub json_ld: Value,
}

impl PageMeta {
    pub fn new(params: &PlayerParams, embed_url: Option<&str>) -> Self {
        Self {
            title: format!("{} - {SITE_SUFFIX}", params.title),
            video_title: params.title.clone(),
            description: DESCRIPTION,
            thumbnail: params
                .video_id
                .as_deref()
                .map(|id| format!("/video-thumbnail-{id}.jpg")),
            embed_url: embed_url.map(str::to_string),
            page_url: params.page_url.clone(),
        }
    }

    pub fn tags(&self) -> Vec<MetaTag> {
        let tag = |attr, key, content: &str| MetaTag {
            attr,
            key,
            content: content.to_string(),
        };
        let embed = self.embed_url.as_deref().unwrap_or("");
        vec![
            tag("name", "description", self.description),
            tag("name", "keywords", KEYWORDS),
            tag("property", "og:type", "video.other"),
            tag("property", "og:title", &self.title),
            tag("property", "og:description", self.description),
            tag("property", "og:image", self.thumbnail.as_deref().unwrap_or("")),
            tag("property", "og:video", embed),
            tag("name", "twitter:card", "player"),
            tag("name", "twitter:title", &self.title),
            tag("name", "twitter:description", self.description),
        ]
    }

    pub fn json_ld(&self, upload_date: DateTime<Utc>) -> Value {
        let embed = self.embed_url.as_deref().unwrap_or("");
        json!({
            "@context": "https://schema.org",
            "@type": "VideoObject",
            "name": self.video_title,
            "description": self.description,
            "thumbnailUrl": self.thumbnail.as_deref().unwrap_or(""),
            "uploadDate": upload_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            "contentUrl": embed,
            "embedUrl": embed,
            "potentialAction": {
                "@type": "WatchAction",
                "target": self.page_url.as_deref().unwrap_or(""),
            }
        })
    }

    pub fn head(&self, upload_date: DateTime<Utc>) -> HeadDocument<'_> {
        HeadDocument {
            title: &self.title,
            meta: self.tags(),
            json_ld: self.json_ld(upload_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta() -> PageMeta {
        let params =
            PlayerParams::from_page_url("https://site.test/player?videoId=1abc&title=Clip")
                .unwrap();
        PageMeta::new(
            &params,
            Some("https://www.1024terabox.com/sharing/embed?surl=abc&autoplay=false&mute=false"),
        )
    }

    #[test]
    fn title_has_site_suffix() {
        assert_eq!(
            meta().title,
            "Clip - TeraBox Video Player | TeraBoxDownloaderPro"
        );
    }

    #[test]
    fn tags_include_social_cards() {
        let tags = meta().tags();
        let find = |k: &str| tags.iter().find(|t| t.key == k).map(|t| t.content.clone());
        assert_eq!(find("og:type").as_deref(), Some("video.other"));
        assert_eq!(find("og:image").as_deref(), Some("/video-thumbnail-1abc.jpg"));
        assert_eq!(find("twitter:card").as_deref(), Some("player"));
    }

    #[test]
    fn json_ld_describes_video() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ld = meta().json_ld(date);
        assert_eq!(ld["@type"], "VideoObject");
        assert_eq!(ld["name"], "Clip");
        assert_eq!(ld["uploadDate"], "2024-05-01T12:00:00.000Z");
        assert_eq!(ld["embedUrl"], ld["contentUrl"]);
        assert_eq!(
            ld["potentialAction"]["target"],
            "https://site.test/player?videoId=1abc&title=Clip"
        );
    }
}
