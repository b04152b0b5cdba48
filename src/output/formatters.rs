use anyhow::Result;
use std::fmt::Write;

use crate::batch::{BatchResponse, UrlResult};

/// Same body the HTTP API returns, pretty-printed
pub fn format_as_json(response: &BatchResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

/// Human-readable listing, one block per URL
pub fn format_as_text(response: &BatchResponse) -> String {
    match response {
        BatchResponse::Error { error, details } => match details {
            Some(details) => format!("Error: {} ({})", error, details),
            None => format!("Error: {}", error),
        },
        BatchResponse::Results { results } => {
            let total = results.len();
            results
                .iter()
                .enumerate()
                .map(|(i, result)| format_result(i + 1, total, result))
                .collect::<Vec<_>>()
                .join("\n\n")
        }
    }
}

fn format_result(index: usize, total: usize, result: &UrlResult) -> String {
    let mut out = format!("[{}/{}] {}", index, total, result.url);

    match (&result.transcript, &result.error) {
        (Some(transcript), _) if result.success => {
            if let Some(video_id) = result.video_id.as_deref().filter(|id| !id.is_empty()) {
                let _ = write!(out, " ({})", video_id);
            }
            let _ = write!(out, "\n{}", transcript);
        }
        (_, error) => {
            let _ = write!(out, "\nFAILED: {}", error.as_deref().unwrap_or("unknown error"));
            if let Some(details) = &result.details {
                let _ = write!(out, "\n  details: {}", details);
            }
        }
    }

    out
}
