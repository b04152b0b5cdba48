use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::TranscriptSegment;
use crate::TranscriptError;

static TIMED_TEXT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<text start="([^"]*)" dur="([^"]*)">([^<]*)</text>"#)
        .expect("timed text pattern is valid")
});

/// A caption track advertised on the watch page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    /// Timed-text URL for this track
    pub base_url: String,

    pub language_code: String,

    /// `asr` for auto-generated tracks
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsSection {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// Pull the caption track list out of a watch page
pub fn parse_caption_tracks(page: &str, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    if page.contains("class=\"g-recaptcha\"") {
        return Err(TranscriptError::TooManyRequests);
    }

    let Some((_, after_captions)) = page.split_once("\"captions\":") else {
        // A page with a playability status but no captions block is a playable
        // video with captions turned off
        return if page.contains("\"playabilityStatus\":") {
            Err(TranscriptError::Disabled(video_id.to_string()))
        } else {
            Err(TranscriptError::VideoUnavailable(video_id.to_string()))
        };
    };

    let json = after_captions
        .split_once(",\"videoDetails")
        .map(|(json, _)| json)
        .ok_or_else(|| TranscriptError::Parse("captions block is not terminated".to_string()))?
        .replace('\n', "");

    let section: CaptionsSection =
        serde_json::from_str(&json).map_err(|e| TranscriptError::Parse(e.to_string()))?;

    let renderer = section
        .player_captions_tracklist_renderer
        .ok_or_else(|| TranscriptError::Disabled(video_id.to_string()))?;

    if renderer.caption_tracks.is_empty() {
        return Err(TranscriptError::NotAvailable(video_id.to_string()));
    }

    Ok(renderer.caption_tracks)
}

/// Parse a timed-text XML document into segments
///
/// Segment text is kept exactly as it appears in the document.
pub fn parse_timed_text(xml: &str) -> Vec<TranscriptSegment> {
    TIMED_TEXT_PATTERN
        .captures_iter(xml)
        .map(|caps| {
            let start = caps[1].parse().unwrap_or(0.0);
            let duration = caps[2].parse().unwrap_or(0.0);
            TranscriptSegment::new(&caps[3], start, duration)
        })
        .collect()
}
