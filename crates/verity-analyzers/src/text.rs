//! Text analyzer backed by a JSON scoring endpoint (Sapling AI detector).

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;
use verity_core::models::{ContentInput, Modality, RawPayload, RawResult};

use crate::analyzer::{Analyzer, AnalyzerError};
use crate::credentials::{CredentialKey, CredentialProvider};
use crate::http::{build_client, number_at, read_json};

pub const TEXT_BACKEND: &str = "sapling";

#[derive(Serialize)]
struct DetectRequest<'a> {
    key: &'a str,
    text: &'a str,
}

pub struct TextAnalyzer {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl Debug for TextAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TextAnalyzer")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl TextAnalyzer {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        Ok(Self {
            http_client: build_client(TEXT_BACKEND, timeout)?,
            endpoint: endpoint.into(),
            credentials,
        })
    }
}

#[async_trait]
impl Analyzer for TextAnalyzer {
    fn name(&self) -> &str {
        TEXT_BACKEND
    }

    fn modality(&self) -> Modality {
        Modality::Text
    }

    async fn analyze(&self, content: &ContentInput) -> Result<RawResult, AnalyzerError> {
        let text = content
            .as_text()
            .ok_or_else(|| AnalyzerError::protocol(TEXT_BACKEND, "expected text content"))?;

        let key = self
            .credentials
            .get(CredentialKey::TextApiKey)
            .ok_or(AnalyzerError::NotConfigured {
                backend: TEXT_BACKEND.to_string(),
                credential: CredentialKey::TextApiKey.env_name(),
            })?;

        tracing::debug!(
            characters = text.chars().count(),
            "Sending text to detection backend"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&DetectRequest {
                key: key.expose(),
                text,
            })
            .send()
            .await
            .map_err(|e| AnalyzerError::from_reqwest(TEXT_BACKEND, e))?;

        let body = read_json(TEXT_BACKEND, response).await?;
        let score = number_at(TEXT_BACKEND, &body, "/score")?;

        tracing::info!(score = score, "Text detection completed");

        Ok(RawResult::backend(
            TEXT_BACKEND,
            RawPayload::TextScore { score },
            body,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use mockito::Matcher;
    use serde_json::json;

    fn analyzer(url: String, credentials: StaticCredentials) -> TextAnalyzer {
        TextAnalyzer::new(url, Duration::from_secs(5), Arc::new(credentials)).unwrap()
    }

    fn keyed() -> StaticCredentials {
        StaticCredentials::new().with(CredentialKey::TextApiKey, "test-key")
    }

    #[tokio::test]
    async fn test_analyze_returns_backend_score() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/aidetect")
            .match_body(Matcher::Json(json!({"key": "test-key", "text": "hello world"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"score": 0.82, "sentence_scores": []}"#)
            .create_async()
            .await;

        let analyzer = analyzer(format!("{}/api/v1/aidetect", server.url()), keyed());
        let raw = analyzer
            .analyze(&ContentInput::text("hello world"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(raw.payload, RawPayload::TextScore { score: 0.82 });
        assert_eq!(raw.method.as_str(), "sapling");
        assert_eq!(raw.response.unwrap()["sentence_scores"], json!([]));
    }

    #[tokio::test]
    async fn test_non_success_status_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(401)
            .with_body("invalid key")
            .create_async()
            .await;

        let analyzer = analyzer(server.url(), keyed());
        let err = analyzer
            .analyze(&ContentInput::text("hello"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "protocol");
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let analyzer = analyzer(server.url(), keyed());
        let err = analyzer
            .analyze(&ContentInput::text("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "protocol");
    }

    #[tokio::test]
    async fn test_missing_score_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"error": "quota"}"#)
            .create_async()
            .await;

        let analyzer = analyzer(server.url(), keyed());
        let err = analyzer
            .analyze(&ContentInput::text("hello"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/score"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let analyzer = analyzer(server.url(), StaticCredentials::new());
        let err = analyzer
            .analyze(&ContentInput::text("hello"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, AnalyzerError::NotConfigured { .. }));
        assert!(err.to_string().contains("TEXT_API_KEY"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let analyzer = analyzer(format!("http://127.0.0.1:{}/aidetect", port), keyed());
        let err = analyzer
            .analyze(&ContentInput::text("hello"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
