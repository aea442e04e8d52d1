//! Shared HTTP plumbing for backend calls.

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::analyzer::AnalyzerError;

pub(crate) fn build_client(backend: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .with_context(|| format!("Failed to create HTTP client for {}", backend))
}

/// Check the status and decode the body as JSON.
pub(crate) async fn read_json(
    backend: &str,
    response: reqwest::Response,
) -> Result<JsonValue, AnalyzerError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AnalyzerError::protocol(
            backend,
            format!("request failed: {} - {}", status, error_text),
        ));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| AnalyzerError::from_reqwest(backend, e))?;

    serde_json::from_slice(&body).map_err(|e| {
        AnalyzerError::protocol(backend, format!("failed to parse response: {}", e))
    })
}

/// Read a finite number at `pointer` (JSON pointer syntax).
pub(crate) fn number_at(
    backend: &str,
    value: &JsonValue,
    pointer: &str,
) -> Result<f64, AnalyzerError> {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_f64)
        .filter(|n| n.is_finite())
        .ok_or_else(|| {
            AnalyzerError::protocol(backend, format!("response is missing numeric {}", pointer))
        })
}
