//! Detection methods for the Verity API client.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use verity_core::models::{DetectionReport, HistoryEntry, Modality};

use crate::{ApiClient, API_PREFIX};

/// History listing. Matches `GET /api/v1/detections`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub results: Vec<HistoryEntry>,
    pub count: usize,
}

/// MIME type for a file, from its extension. Unknown extensions map to
/// `application/octet-stream`, which every file endpoint rejects.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

impl ApiClient {
    pub async fn analyze_text(&self, text: &str) -> Result<DetectionReport> {
        self.post_json(
            &format!("{}/detections/text", API_PREFIX),
            &serde_json::json!({ "text": text }),
        )
        .await
    }

    /// Upload in-memory file content for `modality`.
    pub async fn analyze_bytes(
        &self,
        modality: Modality,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<DetectionReport> {
        if !modality.is_file() {
            return Err(anyhow::anyhow!(
                "{} is not a file modality; use analyze_text",
                modality
            ));
        }

        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .with_context(|| format!("Invalid MIME type: {}", mime_type))?;
        let form = Form::new().part("file", part);

        self.post_multipart(&format!("{}/detections/{}", API_PREFIX, modality), form)
            .await
    }

    /// Upload a local file for `modality`. The MIME type comes from the extension.
    pub async fn analyze_file(&self, modality: Modality, path: &Path) -> Result<DetectionReport> {
        if path
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
        }

        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");

        self.analyze_bytes(modality, file_name, mime_for_path(path), data)
            .await
    }

    /// Most recent detections, newest first. The server clamps `limit`.
    pub async fn list_recent(&self, limit: Option<i64>) -> Result<HistoryResponse> {
        let query: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        self.get(&format!("{}/detections", API_PREFIX), &query)
            .await
    }
}
