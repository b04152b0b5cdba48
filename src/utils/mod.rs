use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the video ID in the URL shapes YouTube hands out:
///
/// - `youtube.com/v/<id>`
/// - `youtube.com/embed/<id>` and `youtube.com/e/<id>`
/// - `youtube.com/<path>/<path2>/<id>` (generic long form)
/// - `youtube.com/watch?v=<id>`, including `&v=` further down the query
/// - `youtu.be/<id>`
static VIDEO_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#)
        .expect("video ID pattern is valid")
});

static BARE_VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("bare video ID pattern is valid"));

/// Superficial check that a string points at YouTube
///
/// This is a syntactic pre-filter only; it says nothing about whether the video
/// exists, is public, or has captions.
pub fn is_youtube_url(url: &str) -> bool {
    !url.is_empty() && (url.contains("youtube.com") || url.contains("youtu.be"))
}

/// Extract the 11-character video ID from a YouTube URL
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Like [`extract_video_id`], but also accepts a bare video ID
pub fn resolve_video_id(input: &str) -> Option<&str> {
    let input = input.trim();
    if BARE_VIDEO_ID.is_match(input) {
        return Some(input);
    }
    extract_video_id(input)
}

/// Decode the handful of HTML entities that show up in caption text
///
/// The order matters: `&amp;#39;` has to be handled before `&#39;` and `&amp;`.
pub fn decode_html_entities(text: &str) -> String {
    text.replace("&amp;#39;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
}
