//! Frame-level video detection client.
//!
//! Posts the whole video to a synchronous frame classifier (Sightengine
//! `video/check-sync`), then averages the per-frame `ai_generated` scores.

use anyhow::Result;
use reqwest::multipart::Form;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;
use verity_core::models::FileInput;

use crate::analyzer::AnalyzerError;
use crate::credentials::CredentialProvider;
use crate::http::{build_client, read_json};
use crate::image::{check_api_status, media_credentials, media_part};

pub const VIDEO_FRAMES_BACKEND: &str = "sightengine-video";

/// Aggregated verdict over all classified frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameVerdict {
    pub filename: Option<String>,
    pub ai_detected: bool,
    pub confidence: f64,
    pub frames_checked: u32,
    pub raw: JsonValue,
}

/// Average `data.frames[].type.ai_generated`; 0 when there are no frames.
pub fn aggregate_frames(body: &JsonValue) -> (f64, u32) {
    let scores: Vec<f64> = body
        .pointer("/data/frames")
        .and_then(JsonValue::as_array)
        .map(|frames| {
            frames
                .iter()
                .filter_map(|frame| frame.pointer("/type/ai_generated").and_then(JsonValue::as_f64))
                .collect()
        })
        .unwrap_or_default();

    if scores.is_empty() {
        return (0.0, 0);
    }
    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    (average, scores.len() as u32)
}

pub struct VideoFrameClient {
    http_client: reqwest::Client,
    endpoint: String,
    models: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl Debug for VideoFrameClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFrameClient")
            .field("endpoint", &self.endpoint)
            .field("models", &self.models)
            .finish()
    }
}

impl VideoFrameClient {
    pub fn new(
        endpoint: impl Into<String>,
        models: impl Into<String>,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        Ok(Self {
            http_client: build_client(VIDEO_FRAMES_BACKEND, timeout)?,
            endpoint: endpoint.into(),
            models: models.into(),
            credentials,
        })
    }

    #[tracing::instrument(skip(self, file), fields(file_size = file.size()))]
    pub async fn check(&self, file: &FileInput) -> Result<FrameVerdict, AnalyzerError> {
        let (api_user, api_secret) =
            media_credentials(VIDEO_FRAMES_BACKEND, self.credentials.as_ref())?;

        let form = Form::new().part("media", media_part(VIDEO_FRAMES_BACKEND, file)?);

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[
                ("api_user", api_user.expose()),
                ("api_secret", api_secret.expose()),
                ("models", self.models.as_str()),
            ])
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalyzerError::from_reqwest(VIDEO_FRAMES_BACKEND, e))?;

        let body = read_json(VIDEO_FRAMES_BACKEND, response).await?;
        check_api_status(VIDEO_FRAMES_BACKEND, &body)?;

        let (confidence, frames_checked) = aggregate_frames(&body);

        tracing::info!(
            frames_checked = frames_checked,
            confidence = confidence,
            "Frame-level video detection completed"
        );

        Ok(FrameVerdict {
            filename: file.file_name.clone(),
            ai_detected: confidence > 0.5,
            confidence,
            frames_checked,
            raw: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialKey, StaticCredentials};
    use bytes::Bytes;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_aggregate_averages_frames() {
        let body = json!({"data": {"frames": [
            {"type": {"ai_generated": 0.9}},
            {"type": {"ai_generated": 0.7}},
            {"type": {"ai_generated": 0.2}},
        ]}});
        let (average, count) = aggregate_frames(&body);
        assert_eq!(count, 3);
        assert!((average - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_without_frames_is_zero() {
        assert_eq!(aggregate_frames(&json!({"data": {"frames": []}})), (0.0, 0));
        assert_eq!(aggregate_frames(&json!({"status": "success"})), (0.0, 0));
    }

    #[tokio::test]
    async fn test_check_sends_credentials_as_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/1.0/video/check-sync.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_user".into(), "u".into()),
                Matcher::UrlEncoded("api_secret".into(), "s".into()),
                Matcher::UrlEncoded("models".into(), "genai".into()),
            ]))
            .match_body(Matcher::Regex(
                r#"name="media"; filename="clip.mp4""#.to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{"status": "success", "data": {"frames": [
                    {"type": {"ai_generated": 0.8}},
                    {"type": {"ai_generated": 0.6}}
                ]}}"#,
            )
            .create_async()
            .await;

        let credentials = StaticCredentials::new()
            .with(CredentialKey::MediaApiUser, "u")
            .with(CredentialKey::MediaApiSecret, "s");
        let client = VideoFrameClient::new(
            format!("{}/1.0/video/check-sync.json", server.url()),
            "genai",
            Duration::from_secs(5),
            Arc::new(credentials),
        )
        .unwrap();

        let file = FileInput::new(
            Some("clip.mp4".to_string()),
            "video/mp4",
            Bytes::from_static(b"fake-video"),
        );
        let verdict = client.check(&file).await.unwrap();

        mock.assert_async().await;
        assert!(verdict.ai_detected);
        assert_eq!(verdict.frames_checked, 2);
        assert!((verdict.confidence - 0.7).abs() < 1e-9);
        assert_eq!(verdict.filename.as_deref(), Some("clip.mp4"));
    }
}
