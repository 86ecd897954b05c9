//! The ephemeral per-session card.

use std::path::PathBuf;

use crate::traits::GeneratedContent;
use crate::types::{Candidate, GrammarPoint, ProgressRecord};

/// A fully prepared review item: reference content and scheduling state
/// merged with per-session generated content.
///
/// Lives only in memory for the duration of one session; never persisted.
#[derive(Debug, Clone)]
pub struct SessionCard {
    pub grammar: GrammarPoint,
    pub progress: ProgressRecord,
    /// Generated challenge content (or a deterministic fallback).
    pub content: GeneratedContent,
    /// Synthesized pronunciation of the reference answer, when available.
    pub audio: Option<PathBuf>,
    /// True when content generation failed and fallback content was used.
    pub degraded: bool,
}

impl SessionCard {
    /// Build a card from a candidate and successfully generated content.
    pub fn prepared(
        candidate: Candidate,
        content: GeneratedContent,
        audio: Option<PathBuf>,
    ) -> Self {
        Self {
            grammar: candidate.grammar,
            progress: candidate.progress,
            content,
            audio,
            degraded: false,
        }
    }

    /// Build a degraded card with deterministic fallback content.
    ///
    /// Used when content generation fails; the batch is never shortened.
    pub fn fallback(candidate: Candidate) -> Self {
        let content = GeneratedContent::fallback_for(&candidate.grammar);
        Self {
            grammar: candidate.grammar,
            progress: candidate.progress,
            content,
            audio: None,
            degraded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, ReviewStatus};

    fn candidate() -> Candidate {
        Candidate {
            grammar: GrammarPoint {
                id: 7,
                level: Level::N3,
                concept: "〜わけではない".to_string(),
                meaning: "it is not the case that".to_string(),
                structure: "plain form + わけではない".to_string(),
                explanation: String::new(),
                tags: vec![],
            },
            progress: ProgressRecord {
                id: 7,
                grammar_id: 7,
                status: ReviewStatus::New,
                interval_days: 0,
                easiness: 2.5,
                repetition_streak: 0,
                next_due: None,
            },
        }
    }

    #[test]
    fn test_fallback_card_is_degraded_and_usable() {
        let card = SessionCard::fallback(candidate());
        assert!(card.degraded);
        assert!(card.audio.is_none());
        assert!(card.content.prompt.contains("〜わけではない"));
        assert!(card.content.context.is_some());
    }

    #[test]
    fn test_prepared_card_keeps_audio() {
        let content = GeneratedContent {
            prompt: "translate this".to_string(),
            context: None,
            hint: None,
            reference_answer: Some("答え".to_string()),
        };
        let card = SessionCard::prepared(candidate(), content, Some(PathBuf::from("/tmp/a.mp3")));
        assert!(!card.degraded);
        assert!(card.audio.is_some());
    }
}
