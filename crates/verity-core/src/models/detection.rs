use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
#[cfg(feature = "sqlx")]
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Modality;

/// Number of characters of text shown in a history preview.
pub const PREVIEW_CHARS: usize = 50;

/// A normalized outcome that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewDetectionOutcome {
    pub content_type: Modality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    pub ai_score: f64,
    pub ai_verdict: String,
    #[schema(value_type = Object)]
    pub analysis_details: JsonValue,
}

impl NewDetectionOutcome {
    pub fn is_ai(&self) -> bool {
        self.analysis_details
            .get("is_ai")
            .and_then(JsonValue::as_bool)
            .unwrap_or(self.ai_score > 0.5)
    }

    pub fn is_fallback(&self) -> bool {
        self.analysis_details
            .get("fallback")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// Attach the identity assigned by the history store.
    pub fn into_stored(self, stored: StoredOutcome) -> DetectionOutcome {
        DetectionOutcome {
            id: stored.id,
            content_type: self.content_type,
            content_text: self.content_text,
            content_url: self.content_url,
            file_name: self.file_name,
            file_size: self.file_size,
            ai_score: self.ai_score,
            ai_verdict: self.ai_verdict,
            analysis_details: self.analysis_details,
            created_at: stored.created_at,
        }
    }
}

/// Identity assigned to an outcome by the history store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct StoredOutcome {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A persisted detection result. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct DetectionOutcome {
    pub id: Uuid,
    pub content_type: Modality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    pub ai_score: f64,
    pub ai_verdict: String,
    #[schema(value_type = Object)]
    pub analysis_details: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl DetectionOutcome {
    /// Short label for history listings: leading text, else the file name.
    pub fn preview(&self) -> String {
        if let Some(text) = self.content_text.as_deref().filter(|t| !t.is_empty()) {
            if text.chars().count() > PREVIEW_CHARS {
                let head: String = text.chars().take(PREVIEW_CHARS).collect();
                return format!("{}...", head);
            }
            return text.to_string();
        }

        match self.file_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "Content analyzed".to_string(),
        }
    }
}

/// History listing row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub outcome: DetectionOutcome,
    pub preview: String,
}

impl From<DetectionOutcome> for HistoryEntry {
    fn from(outcome: DetectionOutcome) -> Self {
        let preview = outcome.preview();
        Self { outcome, preview }
    }
}

/// What a caller receives after a detection request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetectionReport {
    /// Present when the outcome was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub outcome: NewDetectionOutcome,
    pub is_ai: bool,
    pub fallback_used: bool,
    pub recorded: bool,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(text: Option<&str>, file_name: Option<&str>) -> DetectionOutcome {
        DetectionOutcome {
            id: Uuid::new_v4(),
            content_type: if text.is_some() {
                Modality::Text
            } else {
                Modality::Image
            },
            content_text: text.map(str::to_string),
            content_url: None,
            file_name: file_name.map(str::to_string),
            file_size: None,
            ai_score: 0.4,
            ai_verdict: "Human Written".to_string(),
            analysis_details: json!({}),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "a".repeat(80);
        let preview = outcome(Some(&text), None).preview();
        assert_eq!(preview, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(outcome(Some("hello"), None).preview(), "hello");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(60);
        let preview = outcome(Some(&text), None).preview();
        assert_eq!(preview.chars().count(), 53);
    }

    #[test]
    fn test_preview_falls_back_to_file_name() {
        assert_eq!(outcome(None, Some("cat.png")).preview(), "cat.png");
        assert_eq!(outcome(None, None).preview(), "Content analyzed");
    }

    #[test]
    fn test_is_ai_prefers_details_flag() {
        let new = NewDetectionOutcome {
            content_type: Modality::Video,
            content_text: None,
            content_url: None,
            file_name: None,
            file_size: None,
            ai_score: 0.9,
            ai_verdict: "Real Video".to_string(),
            analysis_details: json!({"is_ai": false, "fallback": true}),
        };
        assert!(!new.is_ai());
        assert!(new.is_fallback());
    }

    #[test]
    fn test_report_flattens_outcome_fields() {
        let report = DetectionReport {
            id: None,
            outcome: NewDetectionOutcome {
                content_type: Modality::Text,
                content_text: Some("hi".to_string()),
                content_url: None,
                file_name: None,
                file_size: None,
                ai_score: 0.82,
                ai_verdict: "AI Generated".to_string(),
                analysis_details: json!({"is_ai": true}),
            },
            is_ai: true,
            fallback_used: false,
            recorded: false,
            summary: "done".to_string(),
            warnings: vec![],
            created_at: None,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["ai_score"], json!(0.82));
        assert_eq!(value["content_type"], json!("text"));
        assert!(value.get("id").is_none());
        assert!(value.get("warnings").is_none());
    }
}
