use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::fetcher::{TranscriptSegment, TranscriptSource};
use crate::utils::{decode_html_entities, extract_video_id, is_youtube_url};

pub const NO_URLS_ERROR: &str = "No valid YouTube URLs provided";
pub const INVALID_URL_ERROR: &str = "Invalid YouTube URL";
pub const EMPTY_TRANSCRIPT_ERROR: &str = "No transcript available for this video.";
pub const NO_TRANSCRIPT_ERROR: &str = "No transcript is available for this video.";
pub const UNAVAILABLE_VIDEO_ERROR: &str = "This video is not available or might be private.";
pub const FETCH_FAILED_ERROR: &str = "Failed to retrieve transcript.";

/// One entry of the `urls` array
///
/// Entries that are not strings are kept so they still get a result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UrlEntry {
    Url(String),
    Other(serde_json::Value),
}

impl UrlEntry {
    /// Text reported back in the result's `url` field
    pub fn display(&self) -> String {
        match self {
            UrlEntry::Url(url) => url.clone(),
            UrlEntry::Other(serde_json::Value::Null) => String::new(),
            UrlEntry::Other(value) => value.to_string(),
        }
    }
}

/// Body of `POST /get-transcript`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptRequest {
    /// Batch form
    #[serde(default)]
    pub urls: Option<Vec<UrlEntry>>,

    /// Legacy single-URL form, used only when `urls` is absent
    #[serde(default)]
    pub url: Option<String>,
}

impl TranscriptRequest {
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            urls: Some(urls.into_iter().map(UrlEntry::Url).collect()),
            url: None,
        }
    }

    /// Resolve the ordered list of URLs to process
    pub fn into_urls(self) -> Vec<UrlEntry> {
        match (self.urls, self.url) {
            (Some(urls), _) => urls,
            (None, Some(url)) if !url.is_empty() => vec![UrlEntry::Url(url)],
            _ => Vec::new(),
        }
    }
}

/// Outcome for a single input URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResult {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Raw message of the underlying failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl UrlResult {
    pub fn succeeded(url: &str, video_id: String, transcript: String) -> Self {
        Self {
            url: url.to_string(),
            video_id: Some(video_id),
            success: true,
            transcript: Some(transcript),
            error: None,
            details: None,
        }
    }

    pub fn failed(url: &str, error: &str, details: Option<String>) -> Self {
        Self {
            url: url.to_string(),
            video_id: None,
            success: false,
            transcript: None,
            error: Some(error.to_string()),
            details,
        }
    }
}

/// Response body: either per-URL results or a request-level error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Results {
        results: Vec<UrlResult>,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl BatchResponse {
    pub fn error(error: &str, details: Option<String>) -> Self {
        BatchResponse::Error {
            error: error.to_string(),
            details,
        }
    }
}

/// Map a fetch failure message to the message shown to callers
///
/// Transcript sources only promise a descriptive message, so this matches on
/// wording rather than on error kinds.
pub fn classify_fetch_error(message: &str) -> &'static str {
    if message.contains("Could not find a transcript") {
        NO_TRANSCRIPT_ERROR
    } else if message.contains("is not available") {
        UNAVAILABLE_VIDEO_ERROR
    } else {
        FETCH_FAILED_ERROR
    }
}

/// Join raw segment texts with single spaces, then decode entities
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    let joined = segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    decode_html_entities(&joined)
}

/// Runs a batch of URLs through a transcript source, one at a time
pub struct BatchProcessor {
    source: Arc<dyn TranscriptSource>,
}

impl BatchProcessor {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self { source }
    }

    /// Handle a whole request, short-circuiting when it carries no URLs
    pub async fn process_request(&self, request: TranscriptRequest) -> BatchResponse {
        let urls = request.into_urls();

        if urls.is_empty() {
            tracing::warn!("Request did not contain any URLs");
            return BatchResponse::error(NO_URLS_ERROR, None);
        }

        tracing::info!("Processing batch of {} URL(s)", urls.len());
        let results = self.process_urls(&urls).await;

        BatchResponse::Results { results }
    }

    /// Process every URL in order; each one finishes before the next starts
    pub async fn process_urls(&self, urls: &[UrlEntry]) -> Vec<UrlResult> {
        let mut results = Vec::with_capacity(urls.len());

        for entry in urls {
            let result = match entry {
                UrlEntry::Url(url) => self.process_url(url).await,
                UrlEntry::Other(value) => {
                    tracing::warn!("Skipping non-string URL entry: {}", value);
                    UrlResult::failed(&entry.display(), INVALID_URL_ERROR, None)
                }
            };
            results.push(result);
        }

        results
    }

    /// Process a single URL; failures are reported in the result, never raised
    pub async fn process_url(&self, url: &str) -> UrlResult {
        if !is_youtube_url(url) {
            tracing::warn!("Skipping invalid URL: {:?}", url);
            return UrlResult::failed(url, INVALID_URL_ERROR, None);
        }

        let segments = match self.source.fetch_transcript(url).await {
            Ok(segments) => segments,
            Err(err) => {
                tracing::error!("Error processing URL {}: {}", url, err);
                let message = err.to_string();
                return UrlResult::failed(url, classify_fetch_error(&message), Some(message));
            }
        };

        let transcript = join_segments(&segments);
        if transcript.trim().is_empty() {
            tracing::info!("No transcript available for URL: {}", url);
            return UrlResult::failed(url, EMPTY_TRANSCRIPT_ERROR, None);
        }

        let video_id = extract_video_id(url).unwrap_or_default().to_string();
        tracing::info!(
            "Fetched transcript for URL {} ({} segments)",
            url,
            segments.len()
        );

        UrlResult::succeeded(url, video_id, transcript)
    }
}
