//! Player page parameters.
//!
//! The page is addressed like `/player?videoId=...&title=...`. Parameters
//! follow query-string rules: the first occurrence of a key wins, and an empty
//! value counts as absent.

use governor::BlockedDomains;
use thiserror::Error;
use url::Url;

pub const DEFAULT_TITLE: &str = "TeraBox Video Player";

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("blockedDomains must be a JSON array of strings: {0}")]
    MalformedBlockedDomains(#[source] serde_json::Error),
    #[error("invalid page URL: {0}")]
    InvalidPageUrl(#[from] url::ParseError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerParams {
    pub video_id: Option<String>,
    /// Original share link, shown under the player.
    pub source_url: Option<String>,
    pub title: String,
    pub autoplay: bool,
    pub mute: bool,
    pub blocked_domains: BlockedDomains,
    /// Full page URL, when known.
    pub page_url: Option<String>,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            video_id: None,
            source_url: None,
            title: DEFAULT_TITLE.to_string(),
            autoplay: false,
            mute: false,
            blocked_domains: BlockedDomains::builtin(),
            page_url: None,
        }
    }
}

impl PlayerParams {
    /// Parse a raw query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Result<Self, ParamsError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let get = |key: &str| -> Option<&str> {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .filter(|v| !v.is_empty())
        };

        let blocked_domains = match get("blockedDomains") {
            Some(raw) => {
                BlockedDomains::from_json(raw).map_err(ParamsError::MalformedBlockedDomains)?
            }
            None => BlockedDomains::builtin(),
        };

        Ok(Self {
            video_id: get("videoId").map(str::to_string),
            source_url: get("url").map(str::to_string),
            title: get("title").unwrap_or(DEFAULT_TITLE).to_string(),
            autoplay: get("autoplay") == Some("true"),
            mute: get("mute") == Some("true"),
            blocked_domains,
            page_url: None,
        })
    }

    /// Accepts an absolute page URL, a relative one (`/player?...`) or a bare
    /// query string. Only a leading scheme makes the input absolute; an
    /// unencoded `url=https://...` inside the query does not.
    pub fn from_page_url(input: &str) -> Result<Self, ParamsError> {
        let trimmed = input.trim();
        match Url::parse(trimmed) {
            Ok(url) => {
                let mut params = Self::from_query(url.query().unwrap_or(""))?;
                params.page_url = Some(url.to_string());
                Ok(params)
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => match trimmed.split_once('?') {
                Some((_, query)) => Self::from_query(query),
                None => Self::from_query(trimmed),
            },
            Err(err) => Err(err.into()),
        }
    }

    pub fn has_video(&self) -> bool {
        self.video_id.is_some()
    }
}
