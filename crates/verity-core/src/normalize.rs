//! Result normalization
//!
//! Maps every analyzer's raw payload into the one outcome shape that is
//! persisted and returned to callers. Everything here is pure: the same raw
//! result and subject always produce the same outcome.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Map, Value as JsonValue};

use crate::models::{ContentInput, Modality, NewDetectionOutcome, RawPayload, RawResult};

pub const VERDICT_AI: &str = "AI Generated";
pub const VERDICT_HUMAN_TEXT: &str = "Human Written";
pub const VERDICT_REAL_IMAGE: &str = "Real Image";
pub const VERDICT_REAL_VIDEO: &str = "Real Video";
pub const VERDICT_AUDIO_DEMO: &str = "Likely Human (Demo)";

/// The submitted content as recorded alongside an outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSubject {
    pub text: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub content_url: Option<String>,
}

impl ContentSubject {
    /// Describe `input`. Image files become a `data:` URL when
    /// `embed_image_preview` is set.
    pub fn from_input(input: &ContentInput, embed_image_preview: bool) -> Self {
        match input {
            ContentInput::Text(text) => ContentSubject {
                text: Some(text.clone()),
                ..Default::default()
            },
            ContentInput::File(file) => {
                let mime = file.mime_type.trim().to_lowercase();
                let content_url = (embed_image_preview && mime.starts_with("image/"))
                    .then(|| format!("data:{};base64,{}", mime, STANDARD.encode(&file.data)));

                ContentSubject {
                    text: None,
                    file_name: file.file_name.clone(),
                    file_size: Some(file.size() as i64),
                    mime_type: Some(mime),
                    content_url,
                }
            }
        }
    }
}

/// Clamp a backend score into [0, 1]. The flag reports whether it had to be.
/// Non-finite scores become 0.
pub fn clamp_score(score: f64) -> (f64, bool) {
    if !score.is_finite() {
        return (0.0, true);
    }
    let clamped = score.clamp(0.0, 1.0);
    (clamped, clamped != score)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultNormalizer;

impl ResultNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(
        &self,
        modality: Modality,
        raw: &RawResult,
        subject: &ContentSubject,
    ) -> NewDetectionOutcome {
        let (raw_confidence, backend_is_ai) = match &raw.payload {
            RawPayload::TextScore { score } => (*score, None),
            RawPayload::ImageScore { ai_generated } => (*ai_generated, None),
            RawPayload::VideoVerdict {
                ai_detected,
                confidence,
                ..
            } => (*confidence, Some(*ai_detected)),
            RawPayload::AudioDemo { confidence } => (*confidence, Some(false)),
            RawPayload::Fallback { confidence, .. } => (*confidence, None),
        };

        let (ai_score, score_clamped) = clamp_score(raw_confidence);
        let is_ai = backend_is_ai.unwrap_or(ai_score > 0.5);
        let fallback = raw.is_fallback();

        let mut details = Map::new();
        details.insert("method".into(), json!(raw.method.as_str()));
        details.insert("fallback".into(), json!(fallback));
        details.insert("is_ai".into(), json!(is_ai));
        details.insert("score_clamped".into(), json!(score_clamped));
        details.insert("raw".into(), raw_payload_json(&raw.payload));
        if let Some(response) = &raw.response {
            details.insert("api_response".into(), response.clone());
        }
        if let RawPayload::Fallback { reason, .. } = &raw.payload {
            details.insert("fallback_reason".into(), json!(reason));
        }
        if let Some(text) = &subject.text {
            details.insert("character_count".into(), json!(text.chars().count()));
            details.insert("word_count".into(), json!(text.split_whitespace().count()));
        }
        if let Some(mime) = &subject.mime_type {
            details.insert("file_type".into(), json!(mime));
        }
        if let RawPayload::VideoVerdict { frames_checked, .. } = &raw.payload {
            details.insert("frames_checked".into(), json!(frames_checked));
        }
        if matches!(raw.payload, RawPayload::AudioDemo { .. }) {
            details.insert("demo".into(), json!(true));
        }

        let content_url = match modality {
            Modality::Image | Modality::Video => subject.content_url.clone(),
            _ => None,
        };

        NewDetectionOutcome {
            content_type: modality,
            content_text: subject.text.clone(),
            content_url,
            file_name: subject.file_name.clone(),
            file_size: subject.file_size,
            ai_score,
            ai_verdict: verdict(modality, is_ai).to_string(),
            analysis_details: JsonValue::Object(details),
        }
    }

    /// Human-readable line describing an outcome.
    pub fn summary(&self, outcome: &NewDetectionOutcome) -> String {
        let percent = outcome.ai_score * 100.0;
        let simulated = if outcome.is_fallback() {
            " Backend unavailable, result is simulated."
        } else {
            ""
        };

        match outcome.content_type {
            Modality::Text => {
                let characters = outcome
                    .content_text
                    .as_deref()
                    .map(|t| t.chars().count())
                    .unwrap_or(0);
                format!(
                    "Text analysis complete. {} characters analyzed. API confidence score: {:.1}%{}",
                    characters, percent, simulated
                )
            }
            Modality::Image => {
                let kilobytes = outcome.file_size.unwrap_or(0) as f64 / 1024.0;
                format!(
                    "Image analysis complete. File size: {:.2} KB. Confidence: {:.1}%{}",
                    kilobytes, percent, simulated
                )
            }
            Modality::Video => {
                let frames = outcome
                    .analysis_details
                    .get("frames_checked")
                    .and_then(JsonValue::as_u64)
                    .unwrap_or(0);
                let name = outcome.file_name.as_deref().unwrap_or("unnamed");
                format!("Frames analyzed: {}, File: {}{}", frames, name, simulated)
            }
            Modality::Audio => {
                "Audio analysis complete (DEMO MODE). Real AI audio detection coming soon."
                    .to_string()
            }
        }
    }
}

fn verdict(modality: Modality, is_ai: bool) -> &'static str {
    match (modality, is_ai) {
        (Modality::Audio, _) => VERDICT_AUDIO_DEMO,
        (_, true) => VERDICT_AI,
        (Modality::Text, false) => VERDICT_HUMAN_TEXT,
        (Modality::Image, false) => VERDICT_REAL_IMAGE,
        (Modality::Video, false) => VERDICT_REAL_VIDEO,
    }
}

fn raw_payload_json(payload: &RawPayload) -> JsonValue {
    match payload {
        RawPayload::TextScore { score } => json!({ "score": score }),
        RawPayload::ImageScore { ai_generated } => json!({ "type": { "ai_generated": ai_generated } }),
        RawPayload::VideoVerdict {
            ai_detected,
            confidence,
            frames_checked,
            filename,
        } => json!({
            "ai_detected": ai_detected,
            "confidence": confidence,
            "frames_checked": frames_checked,
            "filename": filename,
        }),
        RawPayload::AudioDemo { confidence } => json!({ "confidence": confidence }),
        RawPayload::Fallback {
            confidence, is_ai, ..
        } => json!({ "confidence": confidence, "is_ai": is_ai }),
    }
}
