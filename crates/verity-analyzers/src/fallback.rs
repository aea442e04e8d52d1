//! Fallback policy for analyzer calls
//!
//! Each backend-backed modality has a `FailurePolicy`. Under `Fallback` a
//! failed call is replaced by a synthetic result labeled `fallback-mock`;
//! under `Surface` the failure is returned to the caller. Modalities without
//! a policy (audio) are passed through untouched.

use rand::Rng;
use std::future::Future;
use verity_core::models::{FailurePolicy, Modality, RawResult};
use verity_core::FailurePolicies;

use crate::analyzer::AnalyzerError;

/// Result of running an analyzer call under the policy.
#[derive(Debug)]
pub enum PolicyOutcome {
    /// The analyzer answered.
    Analyzed(RawResult),
    /// The analyzer failed and a synthetic result was substituted.
    Substituted { raw: RawResult, cause: AnalyzerError },
}

impl PolicyOutcome {
    pub fn raw(&self) -> &RawResult {
        match self {
            PolicyOutcome::Analyzed(raw) => raw,
            PolicyOutcome::Substituted { raw, .. } => raw,
        }
    }

    pub fn into_raw(self) -> RawResult {
        match self {
            PolicyOutcome::Analyzed(raw) => raw,
            PolicyOutcome::Substituted { raw, .. } => raw,
        }
    }

    /// Caller-facing notice when the result is synthetic.
    pub fn warning(&self) -> Option<String> {
        match self {
            PolicyOutcome::Analyzed(_) => None,
            PolicyOutcome::Substituted { cause, .. } => Some(format!(
                "Detection backend unavailable ({}); showing a simulated result",
                cause.kind()
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPolicy {
    policies: FailurePolicies,
}

impl FallbackPolicy {
    pub fn new(policies: FailurePolicies) -> Self {
        Self { policies }
    }

    pub fn policy_for(&self, modality: Modality) -> Option<FailurePolicy> {
        self.policies.for_modality(modality)
    }

    /// Run `call` under the policy configured for `modality`.
    ///
    /// Never returns `Err` for a modality whose policy is `Fallback`.
    pub async fn with_fallback<F>(
        &self,
        modality: Modality,
        call: F,
    ) -> Result<PolicyOutcome, AnalyzerError>
    where
        F: Future<Output = Result<RawResult, AnalyzerError>>,
    {
        match (call.await, self.policy_for(modality)) {
            (Ok(raw), _) => Ok(PolicyOutcome::Analyzed(raw)),
            (Err(cause), Some(FailurePolicy::Fallback)) => {
                tracing::warn!(
                    modality = %modality,
                    error = %cause,
                    error_kind = cause.kind(),
                    "Analyzer failed, substituting fallback result"
                );
                let raw = Self::synthesize_with(&mut rand::rng(), cause.to_string());
                Ok(PolicyOutcome::Substituted { raw, cause })
            }
            (Err(cause), _) => {
                tracing::warn!(
                    modality = %modality,
                    error = %cause,
                    error_kind = cause.kind(),
                    "Analyzer failed, surfacing error"
                );
                Err(cause)
            }
        }
    }

    /// Synthetic result with confidence uniform in [0, 1).
    pub fn synthesize_with<R: Rng + ?Sized>(rng: &mut R, reason: impl Into<String>) -> RawResult {
        RawResult::fallback(rng.random::<f64>(), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use verity_core::models::{AnalysisMethod, RawPayload};

    fn timeout() -> AnalyzerError {
        AnalyzerError::transport("sapling", "timed out")
    }

    fn backend_ok() -> RawResult {
        RawResult::backend(
            "sapling",
            RawPayload::TextScore { score: 0.4 },
            serde_json::json!({"score": 0.4}),
        )
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let policy = FallbackPolicy::default();
        let outcome = policy
            .with_fallback(Modality::Text, async { Ok(backend_ok()) })
            .await
            .unwrap();

        assert!(matches!(outcome, PolicyOutcome::Analyzed(_)));
        assert!(outcome.warning().is_none());
    }

    #[tokio::test]
    async fn test_text_failure_is_substituted() {
        let policy = FallbackPolicy::default();
        let outcome = policy
            .with_fallback(Modality::Text, async { Err(timeout()) })
            .await
            .unwrap();

        assert!(outcome.warning().unwrap().contains("transport"));
        let raw = outcome.into_raw();
        assert_eq!(raw.method, AnalysisMethod::FallbackMock);
        match raw.payload {
            RawPayload::Fallback {
                confidence, is_ai, ..
            } => {
                assert!((0.0..=1.0).contains(&confidence));
                assert_eq!(is_ai, confidence > 0.5);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_image_protocol_failure_is_substituted() {
        let policy = FallbackPolicy::default();
        let outcome = policy
            .with_fallback(Modality::Image, async {
                Err(AnalyzerError::protocol("sightengine", "bad json"))
            })
            .await
            .unwrap();
        assert!(outcome.raw().is_fallback());
    }

    #[tokio::test]
    async fn test_video_surfaces_by_default() {
        let policy = FallbackPolicy::default();
        let result = policy
            .with_fallback(Modality::Video, async {
                Err(AnalyzerError::transport("video-relay", "connection refused"))
            })
            .await;
        assert!(matches!(result, Err(AnalyzerError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_video_can_be_configured_to_fall_back() {
        let policy = FallbackPolicy::new(FailurePolicies {
            video: FailurePolicy::Fallback,
            ..FailurePolicies::default()
        });
        let outcome = policy
            .with_fallback(Modality::Video, async {
                Err(AnalyzerError::transport("video-relay", "connection refused"))
            })
            .await
            .unwrap();
        assert!(outcome.raw().is_fallback());
    }

    #[tokio::test]
    async fn test_fallback_scores_spread_across_trials() {
        let policy = FallbackPolicy::default();
        let mut low = false;
        let mut high = false;

        for _ in 0..200 {
            let outcome = policy
                .with_fallback(Modality::Text, async { Err(timeout()) })
                .await
                .unwrap();
            if let RawPayload::Fallback { confidence, .. } = outcome.raw().payload {
                low |= confidence < 0.5;
                high |= confidence > 0.5;
            }
        }

        assert!(low && high, "fallback confidence should vary across trials");
    }

    #[test]
    fn test_synthesize_is_reproducible_with_seed() {
        let a = FallbackPolicy::synthesize_with(&mut StdRng::seed_from_u64(42), "x");
        let b = FallbackPolicy::synthesize_with(&mut StdRng::seed_from_u64(42), "x");
        assert_eq!(a, b);
    }
}
