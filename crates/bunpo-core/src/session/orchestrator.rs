//! The session orchestrator.
//!
//! Drives one interactive review session: selects a bounded batch, prepares
//! every card through the generation pipeline (tolerating partial failure),
//! then runs the strict two-phase interaction per card. Generation failures
//! degrade individual cards; only a persistence failure during rating is
//! surfaced, and it leaves the session state untouched so the rating can be
//! retried.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{TutorError, TutorResult};
use crate::selector::DueSetSelector;
use crate::session::state::{Phase, SessionState};
use crate::srs::{Quality, SrsEngine};
use crate::traits::{
    ContentProvider, Evaluation, Evaluator, ProgressStore, SpeechSynthesizer,
};
use crate::types::{ReviewType, ReviewWrite, SessionCard};

/// Orchestrates one learner's interactive review session.
///
/// Owns the [`SessionState`] explicitly; there is no ambient or global
/// session. One instance serves one session at a time.
pub struct SessionOrchestrator {
    selector: DueSetSelector,
    store: Arc<dyn ProgressStore>,
    content: Arc<dyn ContentProvider>,
    evaluator: Arc<dyn Evaluator>,
    speech: Arc<dyn SpeechSynthesizer>,
    state: SessionState,
}

impl SessionOrchestrator {
    pub fn new(
        selector: DueSetSelector,
        store: Arc<dyn ProgressStore>,
        content: Arc<dyn ContentProvider>,
        evaluator: Arc<dyn Evaluator>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            selector,
            store,
            content,
            evaluator,
            speech,
            state: SessionState::default(),
        }
    }

    /// Select candidates and prepare every card through the generation
    /// pipeline. Returns the number of prepared cards (0 means nothing due).
    ///
    /// Preparation is deliberately sequential: the generation calls are
    /// rate-sensitive and the progress callback must stay monotonic.
    /// `on_progress` receives `(completed, total)` before each item and once
    /// at the end. The queue always ends up exactly as long as the candidate
    /// list, no matter how many items degrade to fallback cards.
    pub async fn prepare_session<F>(&mut self, mut on_progress: F) -> TutorResult<usize>
    where
        F: FnMut(usize, usize),
    {
        let candidates = self.selector.select_candidates(Utc::now()).await?;
        let total = candidates.len();
        if total == 0 {
            info!("nothing due; session not started");
            return Ok(0);
        }

        let mut cards = Vec::with_capacity(total);
        for (index, candidate) in candidates.into_iter().enumerate() {
            on_progress(index, total);
            debug!(
                concept = %candidate.grammar.concept,
                "preparing card {}/{}",
                index + 1,
                total
            );

            let card = match self.content.generate(&candidate.grammar).await {
                Ok(content) => {
                    let audio = match content.reference_answer.as_deref() {
                        Some(answer) if !answer.is_empty() => {
                            match self.speech.synthesize(answer).await {
                                Ok(path) => Some(path),
                                Err(err) => {
                                    warn!(
                                        concept = %candidate.grammar.concept,
                                        error = %err,
                                        "speech synthesis failed; card kept without audio"
                                    );
                                    None
                                }
                            }
                        }
                        _ => None,
                    };
                    SessionCard::prepared(candidate, content, audio)
                }
                Err(err) => {
                    warn!(
                        concept = %candidate.grammar.concept,
                        error = %err,
                        "content generation failed; using fallback card"
                    );
                    SessionCard::fallback(candidate)
                }
            };
            cards.push(card);
        }
        on_progress(total, total);

        debug_assert_eq!(cards.len(), total);
        self.state.load(cards);
        self.state.advance();
        info!(cards = total, "session prepared");
        Ok(total)
    }

    /// The card currently being reviewed, if any.
    pub fn current_card(&self) -> Option<&SessionCard> {
        self.state.current()
    }

    /// Current interaction phase, `None` when no card is active.
    pub fn phase(&self) -> Option<Phase> {
        self.state.phase()
    }

    /// The answer submitted for the current card, during feedback.
    pub fn last_answer(&self) -> Option<&str> {
        self.state.last_answer()
    }

    /// The evaluation of the last submitted answer, during feedback.
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.state.last_evaluation()
    }

    /// Cards left in this session, counting the current one.
    pub fn remaining_count(&self) -> usize {
        self.state.remaining_count()
    }

    /// Submit the learner's answer for the current card.
    ///
    /// Valid only in the question phase; the trimmed answer must be
    /// non-empty. Evaluator failure is absorbed into a score-0 fallback
    /// evaluation rather than halting the session.
    pub async fn submit_answer(&mut self, text: &str) -> TutorResult<Evaluation> {
        let card = match (self.state.phase(), self.state.current()) {
            (Some(Phase::Question), Some(card)) => card,
            _ => {
                return Err(TutorError::phase_mismatch(
                    "submit_answer is only valid while a question is shown",
                ))
            }
        };

        let answer = text.trim();
        if answer.is_empty() {
            return Err(TutorError::validation_with_code(
                "Answer must not be empty",
                crate::error::ErrorCode::ValEmptyAnswer,
            ));
        }

        let grammar = card.grammar.clone();
        let evaluation = match self.evaluator.evaluate(answer, &grammar).await {
            Ok(eval) => eval.normalized(),
            Err(err) => {
                warn!(concept = %grammar.concept, error = %err, "evaluation failed");
                Evaluation::unavailable(&err.to_string())
            }
        };

        self.state.record_answer(answer.to_string(), evaluation.clone());
        Ok(evaluation)
    }

    /// Rate the current card and schedule its next review.
    ///
    /// Valid only in the feedback phase (which also prevents double-rating).
    /// The progress update and log append are written atomically; if the
    /// write fails the card stays current and in feedback so the same rating
    /// can be retried without losing the displayed evaluation.
    pub async fn rate(&mut self, rating: u8) -> TutorResult<()> {
        let card = match (self.state.phase(), self.state.current()) {
            (Some(Phase::Feedback), Some(card)) => card,
            _ => {
                return Err(TutorError::phase_mismatch(
                    "rate is only valid while feedback is shown",
                ))
            }
        };

        let quality = Quality::try_from(rating)?;
        let progress = &card.progress;
        let update = SrsEngine::compute_next(
            quality,
            progress.repetition_streak,
            progress.easiness,
            progress.interval_days,
            Utc::now(),
        )?;

        let review_type = if update.repetition_streak > 1 {
            ReviewType::Review
        } else {
            ReviewType::Learn
        };
        let write = ReviewWrite {
            progress_id: progress.id,
            grammar_id: card.grammar.id,
            quality,
            review_type,
            interval_days: update.interval_days,
            easiness: update.easiness,
            repetition_streak: update.repetition_streak,
            next_due: update.due_at,
        };

        // On failure the state is deliberately untouched: same card, still
        // in feedback, ready for a retry.
        self.store.record_review(&write).await?;

        debug!(
            grammar_id = write.grammar_id,
            quality = quality.to_rating(),
            interval = write.interval_days,
            "review recorded"
        );
        self.state.advance();
        Ok(())
    }
}
