//! Transcript Batch - fetch YouTube transcripts for batches of video URLs
//!
//! The crate exposes a small HTTP service (`POST /get-transcript`) and a CLI that
//! share the same batch handler: every URL is validated, its captions are fetched
//! from YouTube, and the cleaned-up transcript is returned per URL.

pub mod batch;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod output;
pub mod server;
pub mod utils;

pub use batch::{BatchProcessor, BatchResponse, TranscriptRequest, UrlEntry, UrlResult};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use fetcher::{TranscriptSegment, TranscriptSource};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Errors produced while fetching a transcript
///
/// The `Display` texts are what callers see in the `details` field, and what
/// [`batch::classify_fetch_error`] inspects to pick a user-facing message.
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Impossible to retrieve Youtube video ID from {0}")]
    InvalidVideoId(String),

    #[error("YouTube is receiving too many requests from this IP and now requires solving a captcha to continue")]
    TooManyRequests,

    #[error("Video {0} is not available")]
    VideoUnavailable(String),

    #[error("Could not find a transcript for video {0}: transcripts are disabled")]
    Disabled(String),

    #[error("Could not find a transcript for video {0}")]
    NotAvailable(String),

    #[error(
        "Could not find a transcript for video {video_id} in language {language} (available: {})",
        .available.join(", ")
    )]
    LanguageNotAvailable {
        video_id: String,
        language: String,
        available: Vec<String>,
    },

    #[error("Request to {url} failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse caption data: {0}")]
    Parse(String),
}
