//! SuperMemo-2 spaced-repetition scheduling.
//!
//! The engine is a pure function of its inputs, including the injected
//! clock: identical inputs always produce identical outputs, there is no
//! hidden state and no I/O.
//!
//! One deliberate deviation from canonical SM-2: the easiness factor is
//! updated on failing ratings as well, so low-quality answers penalize
//! easiness even while they reset the streak. This matches the observed
//! behavior of earlier versions of this scheduler and is covered by
//! regression tests.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, TutorError, TutorResult};

/// Lowest permitted easiness factor.
pub const MIN_EASINESS: f64 = 1.3;

/// Easiness assigned to items that have never been reviewed.
pub const DEFAULT_EASINESS: f64 = 2.5;

/// Minimum quality considered a passing recall.
pub const PASSING_QUALITY: u8 = 3;

/// Self-assessed recall quality for one review (SM-2 ratings 0-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Quality {
    /// Complete blackout.
    Blackout = 0,
    /// Incorrect, but the correct answer was remembered once seen.
    Incorrect = 1,
    /// Incorrect, though the correct answer seemed easy to recall.
    AlmostRecalled = 2,
    /// Correct, recalled with serious difficulty.
    Difficult = 3,
    /// Correct after some hesitation.
    Hesitant = 4,
    /// Perfect recall.
    Perfect = 5,
}

impl Quality {
    /// Convert to the raw SM-2 rating value.
    pub fn to_rating(self) -> u8 {
        self as u8
    }

    /// Create from a raw rating value. Returns `None` outside 0..=5.
    pub fn from_rating(rating: u8) -> Option<Self> {
        match rating {
            0 => Some(Quality::Blackout),
            1 => Some(Quality::Incorrect),
            2 => Some(Quality::AlmostRecalled),
            3 => Some(Quality::Difficult),
            4 => Some(Quality::Hesitant),
            5 => Some(Quality::Perfect),
            _ => None,
        }
    }

    /// True for ratings that count as a successful recall (>= 3).
    pub fn is_passing(self) -> bool {
        self.to_rating() >= PASSING_QUALITY
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.to_rating()
    }
}

impl TryFrom<u8> for Quality {
    type Error = TutorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::from_rating(value).ok_or_else(|| {
            TutorError::validation_with_code(
                format!("Rating must be between 0 and 5, got {}", value),
                ErrorCode::ValRatingOutOfRange,
            )
        })
    }
}

/// The scheduling state produced by one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewUpdate {
    /// Days until the next review.
    pub interval_days: u32,
    /// New consecutive-pass count.
    pub repetition_streak: u32,
    /// New easiness factor, floored at [`MIN_EASINESS`].
    pub easiness: f64,
    /// When the item is next due.
    pub due_at: DateTime<Utc>,
}

/// Stateless SM-2 scheduling engine.
pub struct SrsEngine;

impl SrsEngine {
    /// Compute the next scheduling state from a rating and the prior state.
    ///
    /// `previous_interval` is the current interval in days, `now` is the
    /// injected review timestamp. Easiness below [`MIN_EASINESS`] is a
    /// validation error; no state is produced.
    pub fn compute_next(
        quality: Quality,
        repetition_streak: u32,
        easiness: f64,
        previous_interval: u32,
        now: DateTime<Utc>,
    ) -> TutorResult<ReviewUpdate> {
        if easiness < MIN_EASINESS || !easiness.is_finite() {
            return Err(TutorError::validation(format!(
                "Easiness factor must be at least {}, got {}",
                MIN_EASINESS, easiness
            )));
        }

        // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored.
        // Applied unconditionally, including on failing ratings.
        let q = f64::from(quality.to_rating());
        let raw = easiness + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
        let new_easiness = round4(raw.max(MIN_EASINESS));

        let (interval_days, new_streak) = if quality.is_passing() {
            let interval = match repetition_streak {
                0 => 1,
                1 => 6,
                _ => (f64::from(previous_interval) * new_easiness).ceil() as u32,
            };
            (interval, repetition_streak + 1)
        } else {
            // Failed recall resets the streak and restarts at one day.
            (1, 0)
        };

        Ok(ReviewUpdate {
            interval_days,
            repetition_streak: new_streak,
            easiness: new_easiness,
            due_at: now + Duration::days(i64::from(interval_days)),
        })
    }
}

/// Round to 4 decimal places, matching the precision stored for easiness.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_quality_from_rating_bounds() {
        assert_eq!(Quality::from_rating(0), Some(Quality::Blackout));
        assert_eq!(Quality::from_rating(5), Some(Quality::Perfect));
        assert_eq!(Quality::from_rating(6), None);
        assert!(Quality::try_from(9u8).is_err());
    }

    #[test]
    fn test_passing_threshold() {
        assert!(!Quality::AlmostRecalled.is_passing());
        assert!(Quality::Difficult.is_passing());
    }

    #[test]
    fn test_first_review_quality_four() {
        let up = SrsEngine::compute_next(Quality::Hesitant, 0, 2.5, 0, at()).unwrap();
        assert_eq!(up.easiness, 2.5);
        assert_eq!(up.interval_days, 1);
        assert_eq!(up.repetition_streak, 1);
        assert_eq!(up.due_at, at() + Duration::days(1));
    }

    #[test]
    fn test_second_review_quality_five() {
        let up = SrsEngine::compute_next(Quality::Perfect, 1, 2.5, 1, at()).unwrap();
        assert_eq!(up.easiness, 2.6);
        assert_eq!(up.interval_days, 6);
        assert_eq!(up.repetition_streak, 2);
    }

    #[test]
    fn test_failure_resets_streak_but_still_penalizes_easiness() {
        let up = SrsEngine::compute_next(Quality::Incorrect, 2, 2.6, 6, at()).unwrap();
        assert_eq!(up.easiness, 2.06);
        assert_eq!(up.interval_days, 1);
        assert_eq!(up.repetition_streak, 0);
    }

    #[test]
    fn test_mature_interval_uses_new_easiness() {
        // q=5 keeps easiness at 2.6 + 0.1 = 2.7; ceil(10 * 2.7) = 27
        let up = SrsEngine::compute_next(Quality::Perfect, 2, 2.6, 10, at()).unwrap();
        assert_eq!(up.easiness, 2.7);
        assert_eq!(up.interval_days, 27);
    }

    #[test]
    fn test_easiness_never_below_floor() {
        let mut easiness = MIN_EASINESS;
        for _ in 0..10 {
            let up = SrsEngine::compute_next(Quality::Blackout, 0, easiness, 1, at()).unwrap();
            assert!(up.easiness >= MIN_EASINESS);
            easiness = up.easiness;
        }
        assert_eq!(easiness, MIN_EASINESS);
    }

    #[test]
    fn test_pass_increments_streak_for_all_passing_qualities() {
        for q in [Quality::Difficult, Quality::Hesitant, Quality::Perfect] {
            let up = SrsEngine::compute_next(q, 3, 2.0, 12, at()).unwrap();
            assert_eq!(up.repetition_streak, 4);
        }
    }

    #[test]
    fn test_fail_resets_streak_for_all_failing_qualities() {
        for q in [Quality::Blackout, Quality::Incorrect, Quality::AlmostRecalled] {
            let up = SrsEngine::compute_next(q, 3, 2.0, 12, at()).unwrap();
            assert_eq!(up.repetition_streak, 0);
            assert_eq!(up.interval_days, 1);
        }
    }

    #[test]
    fn test_invalid_easiness_rejected() {
        assert!(SrsEngine::compute_next(Quality::Perfect, 0, 1.2, 0, at()).is_err());
        assert!(SrsEngine::compute_next(Quality::Perfect, 0, f64::NAN, 0, at()).is_err());
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let a = SrsEngine::compute_next(Quality::Difficult, 5, 1.9456, 30, at()).unwrap();
        let b = SrsEngine::compute_next(Quality::Difficult, 5, 1.9456, 30, at()).unwrap();
        assert_eq!(a, b);
    }
}
