use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::{Result, TubequizError};

/// Matchers in priority order. Each captures an 11 character id that must be
/// followed by the end of input or a URL boundary.
static MATCHERS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(
            r"^(?:https?://)?(?:www\.|m\.|music\.)?youtube\.com/watch\?(?:[^#]*?&)?v=([A-Za-z0-9_-]{11})(?:[&#]|$)",
        )
        .expect("watch url pattern"),
        Regex::new(r"^(?:https?://)?(?:www\.)?youtu\.be/([A-Za-z0-9_-]{11})(?:[?&#/]|$)")
            .expect("short url pattern"),
        Regex::new(
            r"^(?:https?://)?(?:www\.|m\.)?youtube\.com/(?:embed|shorts|live|v)/([A-Za-z0-9_-]{11})(?:[?&#/]|$)",
        )
        .expect("path url pattern"),
    ]
});

/// Canonical 11 character YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video id from a watch, short, or embed style URL
pub fn extract_video_id(input: &str) -> Result<VideoId> {
    let input = input.trim();
    MATCHERS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| VideoId(caps[1].to_string()))
        .ok_or_else(|| TubequizError::InvalidUrl {
            input: input.to_string(),
        })
}
