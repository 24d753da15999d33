use url::Url;

pub const EMBED_BASE: &str = "https://www.1024terabox.com/sharing/embed";

/// Share ids are passed around with a leading `1` the embed endpoint does not want.
pub fn filter_video_id(video_id: &str) -> &str {
    video_id.strip_prefix('1').unwrap_or(video_id)
}

pub fn embed_url(video_id: &str, autoplay: bool, mute: bool) -> Result<String, url::ParseError> {
    let id = filter_video_id(video_id);
    if id.len() != video_id.len() {
        log::debug!(target: "player", "filtered id (removed leading 1): {id}");
    }
    let url = Url::parse_with_params(
        EMBED_BASE,
        &[
            ("surl", id),
            ("autoplay", if autoplay { "true" } else { "false" }),
            ("mute", if mute { "true" } else { "false" }),
        ],
    )?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_single_leading_one() {
        assert_eq!(filter_video_id("1abc"), "abc");
        assert_eq!(filter_video_id("11abc"), "1abc");
        assert_eq!(filter_video_id("abc1"), "abc1");
    }

    #[test]
    fn builds_embed_url() {
        assert_eq!(
            embed_url("1AbCd", true, false).unwrap(),
            "https://www.1024terabox.com/sharing/embed?surl=AbCd&autoplay=true&mute=false"
        );
    }

    #[test]
    fn encodes_unsafe_ids() {
        let url = embed_url("a&b", false, true).unwrap();
        assert!(url.contains("surl=a%26b&autoplay=false&mute=true"));
    }
}
