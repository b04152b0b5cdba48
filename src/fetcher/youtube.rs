use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::captions::{self, CaptionTrack};
use super::{TranscriptSegment, TranscriptSource};
use crate::config::YoutubeConfig;
use crate::utils::resolve_video_id;
use crate::{Result, TranscriptError};

/// Fetches captions straight from YouTube's watch page and timed-text endpoint
pub struct YoutubeTranscriptFetcher {
    client: Client,
    base_url: String,
    language: Option<String>,
}

impl YoutubeTranscriptFetcher {
    pub fn new(config: &YoutubeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    fn watch_url(&self, video_id: &str) -> std::result::Result<Url, TranscriptError> {
        Url::parse_with_params(&format!("{}/watch", self.base_url), &[("v", video_id)])
            .map_err(|e| TranscriptError::Parse(format!("invalid watch URL: {}", e)))
    }

    async fn get_text(&self, url: &str) -> std::result::Result<String, TranscriptError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Pick the configured language, or the first manually created track
    /// (falling back to auto-generated ones) when none is configured
    fn select_track<'a>(
        &self,
        tracks: &'a [CaptionTrack],
        video_id: &str,
    ) -> std::result::Result<&'a CaptionTrack, TranscriptError> {
        let Some(language) = &self.language else {
            return tracks
                .iter()
                .find(|track| !track.is_auto_generated())
                .or_else(|| tracks.first())
                .ok_or_else(|| TranscriptError::NotAvailable(video_id.to_string()));
        };

        tracks
            .iter()
            .find(|track| &track.language_code == language)
            .ok_or_else(|| TranscriptError::LanguageNotAvailable {
                video_id: video_id.to_string(),
                language: language.clone(),
                available: tracks.iter().map(|t| t.language_code.clone()).collect(),
            })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptFetcher {
    async fn fetch_transcript(
        &self,
        url: &str,
    ) -> std::result::Result<Vec<TranscriptSegment>, TranscriptError> {
        let video_id = resolve_video_id(url)
            .ok_or_else(|| TranscriptError::InvalidVideoId(url.to_string()))?;

        tracing::debug!("Fetching watch page for video: {}", video_id);
        let watch_url = self.watch_url(video_id)?;
        let page = self.get_text(watch_url.as_str()).await?;

        let tracks = captions::parse_caption_tracks(&page, video_id)?;
        let track = self.select_track(&tracks, video_id)?;

        tracing::debug!(
            "Fetching {} captions for video {}",
            track.language_code,
            video_id
        );
        let xml = self.get_text(&track.base_url).await?;
        let segments = captions::parse_timed_text(&xml);

        tracing::debug!("Fetched {} segments for video {}", segments.len(), video_id);
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIDEO_ID: &str = "dQw4w9WgXcQ";
    const WATCH_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn watch_page(tracks: serde_json::Value) -> String {
        let captions = json!({ "playerCaptionsTracklistRenderer": { "captionTracks": tracks } });
        format!(
            "<script>var ytInitialPlayerResponse = {{\"playabilityStatus\":{{\"status\":\"OK\"}},\"captions\":{},\"videoDetails\":{{\"videoId\":\"{}\"}}}};</script>",
            captions, VIDEO_ID
        )
    }

    fn fetcher_for(server: &MockServer, language: Option<&str>) -> YoutubeTranscriptFetcher {
        let config = YoutubeConfig {
            base_url: server.uri(),
            language: language.map(str::to_string),
            ..YoutubeConfig::default()
        };
        YoutubeTranscriptFetcher::new(&config).unwrap()
    }

    async fn mount_watch_page(server: &MockServer, body: String) {
        Mock::given(method("GET"))
            .and(path("/watch"))
            .and(query_param("v", VIDEO_ID))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_transcript() {
        let server = MockServer::start().await;
        let tracks = json!([{
            "baseUrl": format!("{}/api/timedtext?v={}&lang=en", server.uri(), VIDEO_ID),
            "languageCode": "en"
        }]);
        mount_watch_page(&server, watch_page(tracks)).await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<transcript><text start="0" dur="1.5">Hello</text><text start="1.5" dur="2">world &amp;#39;test&amp;#39;</text></transcript>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let segments = fetcher_for(&server, None)
            .fetch_transcript(WATCH_URL)
            .await
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello");
        assert_eq!(segments[1].text, "world &amp;#39;test&amp;#39;");
        assert_eq!(segments[1].start, 1.5);
    }

    #[tokio::test]
    async fn test_fetch_transcript_selects_configured_language() {
        let server = MockServer::start().await;
        let tracks = json!([
            { "baseUrl": format!("{}/api/timedtext?lang=en", server.uri()), "languageCode": "en" },
            { "baseUrl": format!("{}/api/timedtext?lang=de", server.uri()), "languageCode": "de" }
        ]);
        mount_watch_page(&server, watch_page(tracks)).await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("lang", "de"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<transcript><text start="0" dur="1">Hallo</text></transcript>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let segments = fetcher_for(&server, Some("de"))
            .fetch_transcript(WATCH_URL)
            .await
            .unwrap();

        assert_eq!(segments, vec![TranscriptSegment::new("Hallo", 0.0, 1.0)]);
    }

    fn track(language_code: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/api/timedtext?lang={}", language_code),
            language_code: language_code.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_select_track_prefers_manual_captions() {
        let fetcher = YoutubeTranscriptFetcher::new(&YoutubeConfig::default()).unwrap();

        let tracks = vec![track("en", Some("asr")), track("es", None)];
        let selected = fetcher.select_track(&tracks, VIDEO_ID).unwrap();
        assert_eq!(selected.language_code, "es");

        let only_asr = vec![track("en", Some("asr"))];
        let selected = fetcher.select_track(&only_asr, VIDEO_ID).unwrap();
        assert_eq!(selected.language_code, "en");

        assert!(matches!(
            fetcher.select_track(&[], VIDEO_ID),
            Err(TranscriptError::NotAvailable(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_transcript_missing_language() {
        let server = MockServer::start().await;
        let tracks = json!([{ "baseUrl": format!("{}/api/timedtext", server.uri()), "languageCode": "en" }]);
        mount_watch_page(&server, watch_page(tracks)).await;

        let err = fetcher_for(&server, Some("fr"))
            .fetch_transcript(WATCH_URL)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::LanguageNotAvailable { .. }));
        assert!(err.to_string().contains("Could not find a transcript"));
        assert!(err.to_string().contains("available: en"));
    }

    #[tokio::test]
    async fn test_fetch_transcript_disabled() {
        let server = MockServer::start().await;
        mount_watch_page(
            &server,
            r#"{"playabilityStatus":{"status":"OK"},"videoDetails":{}}"#.to_string(),
        )
        .await;

        let err = fetcher_for(&server, None)
            .fetch_transcript(WATCH_URL)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Disabled(_)));
    }

    #[tokio::test]
    async fn test_fetch_transcript_unavailable_video() {
        let server = MockServer::start().await;
        mount_watch_page(&server, "<html>nothing here</html>".to_string()).await;

        let err = fetcher_for(&server, None)
            .fetch_transcript(WATCH_URL)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Video dQw4w9WgXcQ is not available");
    }

    #[tokio::test]
    async fn test_fetch_transcript_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/watch"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetcher_for(&server, None)
            .fetch_transcript(WATCH_URL)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_transcript_without_video_id_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = fetcher_for(&server, None)
            .fetch_transcript("https://www.youtube.com/")
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::InvalidVideoId(_)));
    }

    #[tokio::test]
    async fn test_fetch_transcript_accepts_bare_video_id() {
        let server = MockServer::start().await;
        let tracks = json!([{ "baseUrl": format!("{}/api/timedtext", server.uri()), "languageCode": "en" }]);
        mount_watch_page(&server, watch_page(tracks)).await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<transcript></transcript>"))
            .mount(&server)
            .await;

        let segments = fetcher_for(&server, None)
            .fetch_transcript(VIDEO_ID)
            .await
            .unwrap();

        assert!(segments.is_empty());
    }
}
