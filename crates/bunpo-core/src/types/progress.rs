//! Scheduling state and review history types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::Quality;
use crate::types::GrammarPoint;

/// Lifecycle status of a progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Never rated; `next_due` is meaningless.
    New,
    /// Rated at least once and scheduled.
    Active,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::New => "new",
            ReviewStatus::Active => "active",
        }
    }
}

/// Per-item spaced-repetition scheduling state.
///
/// Exactly one record exists per grammar point, created alongside it at seed
/// time. Only the rating flow mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Database identifier.
    pub id: i64,
    /// The grammar point this record schedules.
    pub grammar_id: i64,
    /// Lifecycle status.
    pub status: ReviewStatus,
    /// Current interval in days.
    pub interval_days: u32,
    /// Easiness factor, never below 1.3.
    pub easiness: f64,
    /// Consecutive passing ratings since the last failure or creation.
    pub repetition_streak: u32,
    /// When the item next becomes due. `None` while status is `New`.
    pub next_due: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// True if this record is due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match (self.status, self.next_due) {
            (ReviewStatus::Active, Some(due)) => due <= now,
            _ => false,
        }
    }
}

/// Whether a review log entry records a first exposure or a repeat review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    Learn,
    Review,
}

impl ReviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::Learn => "learn",
            ReviewType::Review => "review",
        }
    }
}

/// Append-only record of one completed rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLogEntry {
    pub grammar_id: i64,
    pub quality: Quality,
    pub review_type: ReviewType,
    pub reviewed_at: DateTime<Utc>,
}

/// A grammar point joined with its scheduling state - eligible for a batch.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub grammar: GrammarPoint,
    pub progress: ProgressRecord,
}

/// Result of a due/new store query, before batch policy is applied.
#[derive(Debug, Clone, Default)]
pub struct DueAndNew {
    /// Active records whose due date has passed.
    pub due: Vec<Candidate>,
    /// Records that have never been rated.
    pub new: Vec<Candidate>,
}

/// The atomic unit written by the rating flow: the updated scheduling state
/// plus the review log entry, applied together or not at all.
#[derive(Debug, Clone)]
pub struct ReviewWrite {
    pub progress_id: i64,
    pub grammar_id: i64,
    pub quality: Quality,
    pub review_type: ReviewType,
    pub interval_days: u32,
    pub easiness: f64,
    pub repetition_streak: u32,
    pub next_due: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(status: ReviewStatus, next_due: Option<DateTime<Utc>>) -> ProgressRecord {
        ProgressRecord {
            id: 1,
            grammar_id: 1,
            status,
            interval_days: 0,
            easiness: 2.5,
            repetition_streak: 0,
            next_due,
        }
    }

    #[test]
    fn test_new_record_never_due() {
        let now = Utc::now();
        let rec = record(ReviewStatus::New, Some(now - Duration::days(1)));
        assert!(!rec.is_due(now));
    }

    #[test]
    fn test_active_record_due_at_boundary() {
        let now = Utc::now();
        assert!(record(ReviewStatus::Active, Some(now)).is_due(now));
        assert!(!record(ReviewStatus::Active, Some(now + Duration::seconds(1))).is_due(now));
    }
}
