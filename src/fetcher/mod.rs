use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod captions;
pub mod youtube;

pub use youtube::YoutubeTranscriptFetcher;

use crate::TranscriptError;

/// One timed caption unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text, as delivered by the source (entities not yet decoded)
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Anything that can turn a video URL into caption segments
///
/// The batch handler treats implementations as opaque: it only looks at whether
/// the result is empty and at the error message on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the caption segments for the video behind `url`
    async fn fetch_transcript(&self, url: &str) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}
