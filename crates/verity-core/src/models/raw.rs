use serde_json::Value as JsonValue;

/// Method label recorded when the fallback scorer produced a result.
pub const FALLBACK_METHOD: &str = "fallback-mock";
/// Method label recorded for placeholder (demo) results.
pub const DEMO_METHOD: &str = "demo-placeholder";

/// How a raw result was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMethod {
    /// A real backend, identified by name.
    Backend(String),
    FallbackMock,
    DemoPlaceholder,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisMethod::Backend(name) => name,
            AnalysisMethod::FallbackMock => FALLBACK_METHOD,
            AnalysisMethod::DemoPlaceholder => DEMO_METHOD,
        }
    }
}

/// Modality-specific payload returned by an analyzer before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Text backend probability that the text is machine written.
    TextScore { score: f64 },
    /// Image backend `type.ai_generated` value.
    ImageScore { ai_generated: f64 },
    /// Video backend verdict. The backend decides `ai_detected` itself.
    VideoVerdict {
        ai_detected: bool,
        confidence: f64,
        frames_checked: u32,
        filename: Option<String>,
    },
    /// Placeholder audio result.
    AudioDemo { confidence: f64 },
    /// Synthetic substitute produced after a backend failure.
    Fallback {
        confidence: f64,
        is_ai: bool,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    pub method: AnalysisMethod,
    pub payload: RawPayload,
    /// Untouched backend response body, when there was one.
    pub response: Option<JsonValue>,
}

impl RawResult {
    pub fn backend(name: impl Into<String>, payload: RawPayload, response: JsonValue) -> Self {
        Self {
            method: AnalysisMethod::Backend(name.into()),
            payload,
            response: Some(response),
        }
    }

    /// Synthetic result for a failed backend call.
    pub fn fallback(confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            method: AnalysisMethod::FallbackMock,
            payload: RawPayload::Fallback {
                confidence,
                is_ai: confidence > 0.5,
                reason: reason.into(),
            },
            response: None,
        }
    }

    pub fn demo(confidence: f64) -> Self {
        Self {
            method: AnalysisMethod::DemoPlaceholder,
            payload: RawPayload::AudioDemo { confidence },
            response: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.method == AnalysisMethod::FallbackMock
    }
}
