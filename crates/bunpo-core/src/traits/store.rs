//! Persistence trait for scheduling state and review history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TutorResult;
use crate::types::{DueAndNew, ReviewWrite};

/// Persistent store of progress records and review logs.
///
/// The store never sees session state; it only answers candidate queries
/// and applies rating writes.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch due (active, `next_due <= now`) and new candidates, each joined
    /// with its grammar point. `limit` bounds each list at the query level;
    /// batch policy (ordering, caps, truncation) is the selector's job.
    async fn due_and_new(&self, now: DateTime<Utc>, limit: usize) -> TutorResult<DueAndNew>;

    /// Apply one rating: update the progress record and append the review
    /// log entry as a single atomic unit. Partial application is disallowed.
    async fn record_review(&self, write: &ReviewWrite) -> TutorResult<()>;
}
