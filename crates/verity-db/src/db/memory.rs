use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;
use verity_core::models::{DetectionOutcome, NewDetectionOutcome, StoredOutcome};
use verity_core::AppError;

use super::history::HistoryStore;

/// In-process history store.
///
/// Timestamps are strictly increasing even when two records land within the
/// same clock tick, so `recent` ordering is total.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    outcomes: Vec<DetectionOutcome>,
    last_created_at: Option<DateTime<Utc>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.outcomes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn record(&self, outcome: &NewDetectionOutcome) -> Result<StoredOutcome, AppError> {
        let mut inner = self.inner.write().await;

        let now = Utc::now();
        let created_at = match inner.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        inner.last_created_at = Some(created_at);

        let stored = StoredOutcome {
            id: Uuid::new_v4(),
            created_at,
        };
        inner.outcomes.push(outcome.clone().into_stored(stored));

        tracing::debug!(outcome_id = %stored.id, "Detection result recorded in memory");

        Ok(stored)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<DetectionOutcome>, AppError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let inner = self.inner.read().await;

        // Appended in created_at order, so reverse iteration is newest first.
        Ok(inner.outcomes.iter().rev().take(limit).cloned().collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verity_core::Modality;

    fn outcome(text: &str) -> NewDetectionOutcome {
        NewDetectionOutcome {
            content_type: Modality::Text,
            content_text: Some(text.to_string()),
            content_url: None,
            file_name: None,
            file_size: None,
            ai_score: 0.2,
            ai_verdict: "Human Written".to_string(),
            analysis_details: json!({"method": "sapling", "fallback": false, "is_ai": false}),
        }
    }

    #[tokio::test]
    async fn test_record_assigns_unique_ids_and_increasing_timestamps() {
        let store = InMemoryHistoryStore::new();
        let mut previous: Option<StoredOutcome> = None;

        for i in 0..50 {
            let stored = store.record(&outcome(&format!("text {}", i))).await.unwrap();
            if let Some(prev) = previous {
                assert!(stored.created_at > prev.created_at);
                assert_ne!(stored.id, prev.id);
            }
            previous = Some(stored);
        }

        assert_eq!(store.len().await, 50);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_bounded() {
        let store = InMemoryHistoryStore::new();
        for i in 0..15 {
            store.record(&outcome(&format!("text {}", i))).await.unwrap();
        }

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].content_text.as_deref(), Some("text 14"));
        assert!(recent
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_recent_reflects_new_records() {
        let store = InMemoryHistoryStore::new();
        assert!(store.recent(10).await.unwrap().is_empty());

        let stored = store.record(&outcome("first")).await.unwrap();
        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, stored.id);
        assert_eq!(recent[0].created_at, stored.created_at);
    }

    #[tokio::test]
    async fn test_non_positive_limit_returns_nothing() {
        let store = InMemoryHistoryStore::new();
        store.record(&outcome("only")).await.unwrap();
        assert!(store.recent(0).await.unwrap().is_empty());
        assert!(store.recent(-3).await.unwrap().is_empty());
    }
}
