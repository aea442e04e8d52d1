//! Detection orchestration: validate, analyze, normalize, record.

use std::sync::Arc;
use verity_analyzers::{AnalyzerRegistry, FallbackPolicy};
use verity_core::{
    AppError, Config, ContentInput, ContentSubject, ContentValidator, DetectionReport,
    HistoryEntry, Modality, RawResult, ResultNormalizer,
};
use verity_db::HistoryStore;

const NOT_RECORDED_WARNING: &str = "Result could not be saved to history";

/// Composes the validator, the analyzer registry, the fallback policy, the
/// normalizer and the history store into one request path.
///
/// Holds no per-request state; every call is independent.
#[derive(Clone)]
pub struct Orchestrator {
    validator: ContentValidator,
    registry: Arc<AnalyzerRegistry>,
    fallback: FallbackPolicy,
    normalizer: ResultNormalizer,
    history: Arc<dyn HistoryStore>,
    embed_image_preview: bool,
    default_limit: i64,
    max_limit: i64,
}

impl Orchestrator {
    pub fn new(
        config: &Config,
        registry: Arc<AnalyzerRegistry>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            validator: ContentValidator::new(config.limits),
            registry,
            fallback: FallbackPolicy::new(config.failure_policies),
            normalizer: ResultNormalizer::new(),
            history,
            embed_image_preview: config.store_image_preview,
            default_limit: config.history.default_limit,
            max_limit: config.history.max_limit,
        }
    }

    pub fn registry(&self) -> &AnalyzerRegistry {
        &self.registry
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Analyze `input` as `modality` and record the outcome.
    ///
    /// Rejected content never reaches a backend. A history store failure does
    /// not fail the request: the report comes back with `recorded = false`.
    #[tracing::instrument(skip(self, input), fields(modality = %modality))]
    pub async fn handle(
        &self,
        modality: Modality,
        input: ContentInput,
    ) -> Result<DetectionReport, AppError> {
        self.validator.validate(modality, &input)?;

        let analyzer = self.registry.get(modality)?;
        let mut warnings = Vec::new();

        let raw: RawResult = if analyzer.uses_backend() {
            let outcome = self
                .fallback
                .with_fallback(modality, analyzer.analyze(&input))
                .await
                .map_err(|e| AppError::BackendUnavailable {
                    modality,
                    message: e.to_string(),
                })?;
            warnings.extend(outcome.warning());
            outcome.into_raw()
        } else {
            analyzer
                .analyze(&input)
                .await
                .map_err(|e| AppError::BackendUnavailable {
                    modality,
                    message: e.to_string(),
                })?
        };

        let subject = ContentSubject::from_input(&input, self.embed_image_preview);
        let outcome = self.normalizer.normalize(modality, &raw, &subject);
        let summary = self.normalizer.summary(&outcome);
        let is_ai = outcome.is_ai();
        let fallback_used = outcome.is_fallback();

        let (id, created_at) = match self.history.record(&outcome).await {
            Ok(stored) => (Some(stored.id), Some(stored.created_at)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    store = self.history.backend_name(),
                    "Failed to record detection outcome"
                );
                warnings.push(NOT_RECORDED_WARNING.to_string());
                (None, None)
            }
        };

        tracing::info!(
            analyzer = analyzer.name(),
            method = raw.method.as_str(),
            outcome_id = ?id,
            ai_score = outcome.ai_score,
            is_ai = is_ai,
            fallback_used = fallback_used,
            "Detection completed"
        );

        Ok(DetectionReport {
            id,
            outcome,
            is_ai,
            fallback_used,
            recorded: id.is_some(),
            summary,
            warnings,
            created_at,
        })
    }

    /// Clamp a requested history size into `[1, max_limit]`.
    pub fn effective_limit(&self, limit: Option<i64>) -> i64 {
        limit
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }

    /// Most recent outcomes, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<HistoryEntry>, AppError> {
        let limit = self.effective_limit(limit);
        let outcomes = self.history.recent(limit).await?;
        Ok(outcomes.into_iter().map(HistoryEntry::from).collect())
    }
}
