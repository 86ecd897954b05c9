//! Content provider trait and its result type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TutorResult;
use crate::types::GrammarPoint;

/// Challenge content generated for one grammar point.
///
/// All non-essential fields are explicitly optional; providers normalize
/// whatever shape their backend returns into this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// The challenge shown to the learner.
    pub prompt: String,
    /// Explanation of the grammar nuance being exercised.
    #[serde(default)]
    pub context: Option<String>,
    /// Optional vocabulary or usage hint.
    #[serde(default)]
    pub hint: Option<String>,
    /// The reference answer, used for feedback display and speech synthesis.
    #[serde(default)]
    pub reference_answer: Option<String>,
}

impl GeneratedContent {
    /// Deterministic fallback content for when generation fails.
    ///
    /// The learner still gets a usable prompt; the context marks the card
    /// as degraded so the caller can surface that.
    pub fn fallback_for(point: &GrammarPoint) -> Self {
        Self {
            prompt: format!(
                "Write a sentence of your own using 「{}」.",
                point.concept
            ),
            context: Some("Content generation failed; practicing without a generated challenge.".to_string()),
            hint: if point.meaning.is_empty() {
                None
            } else {
                Some(format!("This pattern means: {}", point.meaning))
            },
            reference_answer: None,
        }
    }
}

/// Generates challenge content for a grammar point.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Generate challenge content for one grammar point.
    async fn generate(&self, point: &GrammarPoint) -> TutorResult<GeneratedContent>;
}
