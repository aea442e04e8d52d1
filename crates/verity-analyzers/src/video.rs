//! Video analyzer.
//!
//! In relay mode the file is posted to a service that answers with a finished
//! verdict (`POST /detect-video` of this API is one such service). In direct
//! mode the frame-level endpoint is called from here.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value as JsonValue;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use verity_core::models::{ContentInput, Modality, RawPayload, RawResult};

use crate::analyzer::{Analyzer, AnalyzerError};
use crate::http::{build_client, read_json};
use crate::video_frames::{VideoFrameClient, VIDEO_FRAMES_BACKEND};

pub const VIDEO_RELAY_BACKEND: &str = "video-relay";

enum Mode {
    Relay {
        http_client: reqwest::Client,
        endpoint: String,
    },
    Direct(VideoFrameClient),
}

pub struct VideoAnalyzer {
    mode: Mode,
}

impl Debug for VideoAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.mode {
            Mode::Relay { endpoint, .. } => f
                .debug_struct("VideoAnalyzer")
                .field("mode", &"relay")
                .field("endpoint", endpoint)
                .finish(),
            Mode::Direct(client) => f
                .debug_struct("VideoAnalyzer")
                .field("mode", &"direct")
                .field("client", client)
                .finish(),
        }
    }
}

impl VideoAnalyzer {
    pub fn relay(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            mode: Mode::Relay {
                http_client: build_client(VIDEO_RELAY_BACKEND, timeout)?,
                endpoint: endpoint.into(),
            },
        })
    }

    pub fn direct(client: VideoFrameClient) -> Self {
        Self {
            mode: Mode::Direct(client),
        }
    }

    async fn analyze_via_relay(
        http_client: &reqwest::Client,
        endpoint: &str,
        content: &ContentInput,
    ) -> Result<RawResult, AnalyzerError> {
        let file = content
            .as_file()
            .ok_or_else(|| AnalyzerError::protocol(VIDEO_RELAY_BACKEND, "expected a video file"))?;

        let part = Part::bytes(file.data.to_vec())
            .file_name(file.upload_name())
            .mime_str(&file.mime_type)
            .map_err(|e| {
                AnalyzerError::protocol(VIDEO_RELAY_BACKEND, format!("invalid MIME type: {}", e))
            })?;

        let response = http_client
            .post(endpoint)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(|e| AnalyzerError::from_reqwest(VIDEO_RELAY_BACKEND, e))?;

        let body = read_json(VIDEO_RELAY_BACKEND, response).await?;
        if !body.is_object() {
            return Err(AnalyzerError::protocol(
                VIDEO_RELAY_BACKEND,
                "expected a JSON object",
            ));
        }

        // Absent fields read as "not detected".
        let ai_detected = body
            .get("ai_detected")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        let confidence = body
            .get("confidence")
            .and_then(JsonValue::as_f64)
            .unwrap_or(0.0);
        let frames_checked = body
            .get("frames_checked")
            .and_then(JsonValue::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(0);
        let filename = body
            .get("filename")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .or_else(|| file.file_name.clone());

        tracing::info!(
            ai_detected = ai_detected,
            confidence = confidence,
            frames_checked = frames_checked,
            "Video detection completed"
        );

        Ok(RawResult::backend(
            VIDEO_RELAY_BACKEND,
            RawPayload::VideoVerdict {
                ai_detected,
                confidence,
                frames_checked,
                filename,
            },
            body,
        ))
    }
}

#[async_trait]
impl Analyzer for VideoAnalyzer {
    fn name(&self) -> &str {
        match self.mode {
            Mode::Relay { .. } => VIDEO_RELAY_BACKEND,
            Mode::Direct(_) => VIDEO_FRAMES_BACKEND,
        }
    }

    fn modality(&self) -> Modality {
        Modality::Video
    }

    async fn analyze(&self, content: &ContentInput) -> Result<RawResult, AnalyzerError> {
        match &self.mode {
            Mode::Relay {
                http_client,
                endpoint,
            } => Self::analyze_via_relay(http_client, endpoint, content).await,
            Mode::Direct(client) => {
                let file = content.as_file().ok_or_else(|| {
                    AnalyzerError::protocol(VIDEO_FRAMES_BACKEND, "expected a video file")
                })?;
                let verdict = client.check(file).await?;
                Ok(RawResult::backend(
                    VIDEO_FRAMES_BACKEND,
                    RawPayload::VideoVerdict {
                        ai_detected: verdict.ai_detected,
                        confidence: verdict.confidence,
                        frames_checked: verdict.frames_checked,
                        filename: verdict.filename,
                    },
                    verdict.raw,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialKey, StaticCredentials};
    use bytes::Bytes;
    use mockito::Matcher;
    use std::sync::Arc;

    fn clip() -> ContentInput {
        ContentInput::file(
            Some("clip.mp4".to_string()),
            "video/mp4",
            Bytes::from_static(b"fake-video"),
        )
    }

    #[tokio::test]
    async fn test_relay_reads_verdict() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/detect-video")
            .match_body(Matcher::Regex(r#"name="file"; filename="clip.mp4""#.to_string()))
            .with_status(200)
            .with_body(
                r#"{"filename": "clip.mp4", "ai_detected": true, "confidence": 0.77,
                    "frames_checked": 24, "raw": {}}"#,
            )
            .create_async()
            .await;

        let analyzer = VideoAnalyzer::relay(
            format!("{}/detect-video", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let raw = analyzer.analyze(&clip()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(analyzer.name(), "video-relay");
        assert_eq!(
            raw.payload,
            RawPayload::VideoVerdict {
                ai_detected: true,
                confidence: 0.77,
                frames_checked: 24,
                filename: Some("clip.mp4".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_relay_missing_fields_default_to_not_detected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let analyzer = VideoAnalyzer::relay(server.url(), Duration::from_secs(5)).unwrap();
        let raw = analyzer.analyze(&clip()).await.unwrap();

        assert_eq!(
            raw.payload,
            RawPayload::VideoVerdict {
                ai_detected: false,
                confidence: 0.0,
                frames_checked: 0,
                filename: Some("clip.mp4".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_relay_server_error_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let analyzer = VideoAnalyzer::relay(server.url(), Duration::from_secs(5)).unwrap();
        let err = analyzer.analyze(&clip()).await.unwrap_err();
        assert_eq!(err.kind(), "protocol");
    }

    #[tokio::test]
    async fn test_direct_mode_uses_frame_client() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/check-sync.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status": "success", "data": {"frames": [{"type": {"ai_generated": 0.1}}]}}"#)
            .create_async()
            .await;

        let credentials = StaticCredentials::new()
            .with(CredentialKey::MediaApiUser, "u")
            .with(CredentialKey::MediaApiSecret, "s");
        let client = VideoFrameClient::new(
            format!("{}/check-sync.json", server.url()),
            "genai",
            Duration::from_secs(5),
            Arc::new(credentials),
        )
        .unwrap();
        let analyzer = VideoAnalyzer::direct(client);

        let raw = analyzer.analyze(&clip()).await.unwrap();
        assert_eq!(analyzer.name(), "sightengine-video");
        assert!(matches!(
            raw.payload,
            RawPayload::VideoVerdict {
                ai_detected: false,
                frames_checked: 1,
                ..
            }
        ));
    }
}
