//! Due-set selection policy.
//!
//! Queries the store for due and new items and applies the batch policy:
//! deterministic ordering, an independent cap on new items, and an overall
//! session cap. The session cap exists because every candidate costs one
//! external generation call during preparation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TutorResult;
use crate::traits::ProgressStore;
use crate::types::Candidate;

/// Batch sizing policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Overall cap on a session batch.
    pub max_session_size: usize,
    /// Independent cap on never-reviewed items, applied before the overall cap.
    pub max_new: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_session_size: 10,
            max_new: 10,
        }
    }
}

/// The selected candidates, split by origin.
///
/// Both lists are ordered by level rank descending (most advanced content
/// first) with grammar id ascending as the stable tiebreaker.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub due: Vec<Candidate>,
    pub new: Vec<Candidate>,
}

impl BatchPlan {
    /// Total candidates before the session cap.
    pub fn total(&self) -> usize {
        self.due.len() + self.new.len()
    }

    /// Concatenate due then new and truncate to the session cap.
    pub fn flatten(self, max_session_size: usize) -> Vec<Candidate> {
        let mut all = self.due;
        all.extend(self.new);
        all.truncate(max_session_size);
        all
    }
}

/// Selects the bounded candidate set for one session.
pub struct DueSetSelector {
    store: Arc<dyn ProgressStore>,
    config: BatchConfig,
}

impl DueSetSelector {
    pub fn new(store: Arc<dyn ProgressStore>, config: BatchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Query the store and apply ordering and the per-list caps.
    ///
    /// The caller flattens the plan with [`BatchPlan::flatten`] (or inspects
    /// the split for display).
    pub async fn select_batch(&self, now: DateTime<Utc>) -> TutorResult<BatchPlan> {
        let mut fetched = self
            .store
            .due_and_new(now, self.config.max_session_size.max(self.config.max_new))
            .await?;

        order_candidates(&mut fetched.due);
        order_candidates(&mut fetched.new);
        fetched.new.truncate(self.config.max_new);

        debug!(
            due = fetched.due.len(),
            new = fetched.new.len(),
            "selected session batch"
        );

        Ok(BatchPlan {
            due: fetched.due,
            new: fetched.new,
        })
    }

    /// Convenience: select and flatten in one call.
    pub async fn select_candidates(&self, now: DateTime<Utc>) -> TutorResult<Vec<Candidate>> {
        Ok(self
            .select_batch(now)
            .await?
            .flatten(self.config.max_session_size))
    }
}

/// Level rank descending, then grammar id ascending.
fn order_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.grammar
            .level
            .rank()
            .cmp(&a.grammar.level.rank())
            .then(a.grammar.id.cmp(&b.grammar.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::traits::ProgressStore;
    use crate::types::{
        DueAndNew, GrammarPoint, Level, ProgressRecord, ReviewStatus, ReviewWrite,
    };

    struct FixedStore {
        data: Mutex<DueAndNew>,
    }

    #[async_trait]
    impl ProgressStore for FixedStore {
        async fn due_and_new(&self, _now: DateTime<Utc>, _limit: usize) -> TutorResult<DueAndNew> {
            Ok(self.data.lock().unwrap().clone())
        }

        async fn record_review(&self, _write: &ReviewWrite) -> TutorResult<()> {
            Ok(())
        }
    }

    fn candidate(id: i64, level: Level, status: ReviewStatus) -> Candidate {
        Candidate {
            grammar: GrammarPoint {
                id,
                level,
                concept: format!("pattern-{}", id),
                meaning: String::new(),
                structure: String::new(),
                explanation: String::new(),
                tags: vec![],
            },
            progress: ProgressRecord {
                id,
                grammar_id: id,
                status,
                interval_days: 0,
                easiness: 2.5,
                repetition_streak: 0,
                next_due: None,
            },
        }
    }

    fn selector(due: Vec<Candidate>, new: Vec<Candidate>, config: BatchConfig) -> DueSetSelector {
        DueSetSelector::new(
            Arc::new(FixedStore {
                data: Mutex::new(DueAndNew { due, new }),
            }),
            config,
        )
    }

    #[tokio::test]
    async fn test_ordering_level_desc_then_id_asc() {
        let due = vec![
            candidate(3, Level::N4, ReviewStatus::Active),
            candidate(1, Level::N1, ReviewStatus::Active),
            candidate(2, Level::N1, ReviewStatus::Active),
            candidate(4, Level::N5, ReviewStatus::Active),
        ];
        let sel = selector(due, vec![], BatchConfig::default());
        let plan = sel.select_batch(Utc::now()).await.unwrap();
        let ids: Vec<i64> = plan.due.iter().map(|c| c.grammar.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_due_precedes_new_and_cap_applies() {
        let due: Vec<_> = (1..=6)
            .map(|i| candidate(i, Level::N3, ReviewStatus::Active))
            .collect();
        let new: Vec<_> = (10..=16)
            .map(|i| candidate(i, Level::N3, ReviewStatus::New))
            .collect();
        let config = BatchConfig {
            max_session_size: 8,
            max_new: 10,
        };
        let sel = selector(due, new, config);
        let flat = sel.select_candidates(Utc::now()).await.unwrap();

        assert_eq!(flat.len(), 8);
        let ids: Vec<i64> = flat.iter().map(|c| c.grammar.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 10, 11]);
    }

    #[tokio::test]
    async fn test_new_items_capped_independently() {
        let new: Vec<_> = (1..=20)
            .map(|i| candidate(i, Level::N2, ReviewStatus::New))
            .collect();
        let config = BatchConfig {
            max_session_size: 50,
            max_new: 10,
        };
        let sel = selector(vec![], new, config);
        let plan = sel.select_batch(Utc::now()).await.unwrap();
        assert_eq!(plan.new.len(), 10);
    }

    #[tokio::test]
    async fn test_never_exceeds_session_cap() {
        let due: Vec<_> = (1..=30)
            .map(|i| candidate(i, Level::N3, ReviewStatus::Active))
            .collect();
        let sel = selector(due, vec![], BatchConfig::default());
        let flat = sel.select_candidates(Utc::now()).await.unwrap();
        assert_eq!(flat.len(), 10);
    }
}
