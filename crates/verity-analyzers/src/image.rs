//! Image analyzer backed by a multipart classification endpoint (Sightengine
//! `genai` model).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value as JsonValue;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;
use verity_core::models::{ContentInput, FileInput, Modality, RawPayload, RawResult};

use crate::analyzer::{Analyzer, AnalyzerError};
use crate::credentials::{CredentialKey, CredentialProvider, Secret};
use crate::http::{build_client, number_at, read_json};

pub const IMAGE_BACKEND: &str = "sightengine";

pub struct ImageAnalyzer {
    http_client: reqwest::Client,
    endpoint: String,
    models: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl Debug for ImageAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImageAnalyzer")
            .field("endpoint", &self.endpoint)
            .field("models", &self.models)
            .finish()
    }
}

impl ImageAnalyzer {
    pub fn new(
        endpoint: impl Into<String>,
        models: impl Into<String>,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        Ok(Self {
            http_client: build_client(IMAGE_BACKEND, timeout)?,
            endpoint: endpoint.into(),
            models: models.into(),
            credentials,
        })
    }
}

/// Fetch the api_user/api_secret pair used by the media backends.
pub(crate) fn media_credentials(
    backend: &str,
    credentials: &dyn CredentialProvider,
) -> Result<(Secret, Secret), AnalyzerError> {
    let fetch = |key: CredentialKey| {
        credentials.get(key).ok_or(AnalyzerError::NotConfigured {
            backend: backend.to_string(),
            credential: key.env_name(),
        })
    };
    Ok((
        fetch(CredentialKey::MediaApiUser)?,
        fetch(CredentialKey::MediaApiSecret)?,
    ))
}

/// Multipart part carrying the uploaded file under `media`.
pub(crate) fn media_part(backend: &str, file: &FileInput) -> Result<Part, AnalyzerError> {
    Part::bytes(file.data.to_vec())
        .file_name(file.upload_name())
        .mime_str(&file.mime_type)
        .map_err(|e| AnalyzerError::protocol(backend, format!("invalid MIME type: {}", e)))
}

/// Sightengine answers 200 with `status: "failure"` for rejected requests.
pub(crate) fn check_api_status(backend: &str, body: &JsonValue) -> Result<(), AnalyzerError> {
    match body.get("status").and_then(JsonValue::as_str) {
        Some("failure") => {
            let message = body
                .pointer("/error/message")
                .and_then(JsonValue::as_str)
                .unwrap_or("unknown error");
            Err(AnalyzerError::protocol(
                backend,
                format!("backend reported failure: {}", message),
            ))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl Analyzer for ImageAnalyzer {
    fn name(&self) -> &str {
        IMAGE_BACKEND
    }

    fn modality(&self) -> Modality {
        Modality::Image
    }

    async fn analyze(&self, content: &ContentInput) -> Result<RawResult, AnalyzerError> {
        let file = content
            .as_file()
            .ok_or_else(|| AnalyzerError::protocol(IMAGE_BACKEND, "expected an image file"))?;
        let (api_user, api_secret) = media_credentials(IMAGE_BACKEND, self.credentials.as_ref())?;

        let form = Form::new()
            .part("media", media_part(IMAGE_BACKEND, file)?)
            .text("models", self.models.clone())
            .text("api_user", api_user.expose().to_string())
            .text("api_secret", api_secret.expose().to_string());

        tracing::debug!(
            file_size = file.size(),
            mime_type = %file.mime_type,
            "Sending image to detection backend"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalyzerError::from_reqwest(IMAGE_BACKEND, e))?;

        let body = read_json(IMAGE_BACKEND, response).await?;
        check_api_status(IMAGE_BACKEND, &body)?;
        let ai_generated = number_at(IMAGE_BACKEND, &body, "/type/ai_generated")?;

        tracing::info!(ai_generated = ai_generated, "Image detection completed");

        Ok(RawResult::backend(
            IMAGE_BACKEND,
            RawPayload::ImageScore { ai_generated },
            body,
        ))
    }
}
