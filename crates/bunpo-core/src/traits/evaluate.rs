//! Answer evaluation trait and its result type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TutorResult;
use crate::types::GrammarPoint;

/// Structured result of evaluating a learner's free-form answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Concise analysis of the answer.
    pub feedback: String,
    /// Corrected sentence when one is needed.
    #[serde(default)]
    pub correction: Option<String>,
    /// A natural native example using the target grammar.
    #[serde(default)]
    pub better_sentence: Option<String>,
    /// Suggested quality score, clamped to 0..=5.
    pub score: u8,
}

impl Evaluation {
    /// Clamp the score into the valid rating range.
    pub fn normalized(mut self) -> Self {
        self.score = self.score.min(5);
        self
    }

    /// Fallback evaluation used when the evaluator itself fails.
    ///
    /// Score 0 so that a learner who cannot be evaluated is not silently
    /// credited with a pass.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            feedback: format!("Evaluation unavailable: {}", reason),
            correction: None,
            better_sentence: None,
            score: 0,
        }
    }
}

/// Scores a learner's answer against a grammar point.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Evaluate a (non-empty, pre-trimmed) answer for the given grammar point.
    async fn evaluate(&self, answer: &str, point: &GrammarPoint) -> TutorResult<Evaluation>;
}
