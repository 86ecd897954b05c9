//! Explicit session state, owned by one orchestrator instance.

use std::collections::VecDeque;

use crate::traits::Evaluation;
use crate::types::SessionCard;

/// Interaction phase of the current card.
///
/// Transitions within a card are monotonic: `Question` -> `Feedback` ->
/// card retired. Never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The challenge is shown; waiting for the learner's answer.
    Question,
    /// The evaluation is shown; waiting for the learner's self-rating.
    Feedback,
}

/// All mutable state of one interactive session.
///
/// The queue and `current` partition the prepared batch: a card is either
/// waiting in the queue, the single current card, or retired.
#[derive(Debug, Default)]
pub struct SessionState {
    queue: VecDeque<SessionCard>,
    current: Option<SessionCard>,
    phase: Option<Phase>,
    last_answer: Option<String>,
    last_evaluation: Option<Evaluation>,
}

impl SessionState {
    /// Replace the queue with a freshly prepared batch, discarding any
    /// previous session remnants.
    pub fn load(&mut self, cards: Vec<SessionCard>) {
        self.queue = cards.into();
        self.current = None;
        self.phase = None;
        self.last_answer = None;
        self.last_evaluation = None;
    }

    /// Pop the queue head into `current` and reset the per-card state.
    /// With an empty queue the session ends (`current` becomes `None`).
    pub fn advance(&mut self) {
        self.current = self.queue.pop_front();
        self.phase = self.current.as_ref().map(|_| Phase::Question);
        self.last_answer = None;
        self.last_evaluation = None;
    }

    /// Record a submitted answer and its evaluation, moving to feedback.
    pub fn record_answer(&mut self, answer: String, evaluation: Evaluation) {
        self.last_answer = Some(answer);
        self.last_evaluation = Some(evaluation);
        self.phase = Some(Phase::Feedback);
    }

    pub fn current(&self) -> Option<&SessionCard> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn last_answer(&self) -> Option<&str> {
        self.last_answer.as_deref()
    }

    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    /// Cards left in this session, counting the current card.
    pub fn remaining_count(&self) -> usize {
        self.queue.len() + usize::from(self.current.is_some())
    }

    /// True when there is neither a current card nor anything queued.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, GrammarPoint, Level, ProgressRecord, ReviewStatus};

    fn card(id: i64) -> SessionCard {
        SessionCard::fallback(Candidate {
            grammar: GrammarPoint {
                id,
                level: Level::N5,
                concept: format!("p{}", id),
                meaning: String::new(),
                structure: String::new(),
                explanation: String::new(),
                tags: vec![],
            },
            progress: ProgressRecord {
                id,
                grammar_id: id,
                status: ReviewStatus::New,
                interval_days: 0,
                easiness: 2.5,
                repetition_streak: 0,
                next_due: None,
            },
        })
    }

    #[test]
    fn test_advance_through_queue_to_empty() {
        let mut state = SessionState::default();
        state.load(vec![card(1), card(2)]);
        assert!(state.current().is_none());
        assert_eq!(state.remaining_count(), 2);

        state.advance();
        assert_eq!(state.current().unwrap().grammar.id, 1);
        assert_eq!(state.phase(), Some(Phase::Question));
        assert_eq!(state.remaining_count(), 2);

        state.advance();
        assert_eq!(state.current().unwrap().grammar.id, 2);
        assert_eq!(state.remaining_count(), 1);

        state.advance();
        assert!(state.is_empty());
        assert!(state.phase().is_none());
        assert_eq!(state.remaining_count(), 0);
    }

    #[test]
    fn test_record_answer_moves_to_feedback_and_advance_clears() {
        let mut state = SessionState::default();
        state.load(vec![card(1)]);
        state.advance();

        state.record_answer(
            "私の答え".to_string(),
            Evaluation::unavailable("stub"),
        );
        assert_eq!(state.phase(), Some(Phase::Feedback));
        assert_eq!(state.last_answer(), Some("私の答え"));
        assert!(state.last_evaluation().is_some());

        state.advance();
        assert!(state.last_answer().is_none());
        assert!(state.last_evaluation().is_none());
    }
}
