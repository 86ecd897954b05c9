//! Offline provider used when no API key is configured.

use async_trait::async_trait;

use bunpo_core::{
    ContentProvider, Evaluation, Evaluator, GeneratedContent, GrammarPoint, TutorResult,
};

/// Deterministic tutor for running without an API key.
///
/// Challenges fall back to free composition prompts built from the grammar
/// point itself; evaluations explain that AI scoring is unavailable and
/// score 0 so nothing is silently credited as a pass.
pub struct OfflineTutor;

#[async_trait]
impl ContentProvider for OfflineTutor {
    async fn generate(&self, point: &GrammarPoint) -> TutorResult<GeneratedContent> {
        Ok(GeneratedContent {
            prompt: format!(
                "Write a sentence about daily life using 「{}」.",
                point.concept
            ),
            context: Some(format!(
                "Offline mode. Structure: {}",
                point.structure
            )),
            hint: if point.meaning.is_empty() {
                None
            } else {
                Some(format!("This pattern means: {}", point.meaning))
            },
            reference_answer: None,
        })
    }
}

#[async_trait]
impl Evaluator for OfflineTutor {
    async fn evaluate(&self, _answer: &str, _point: &GrammarPoint) -> TutorResult<Evaluation> {
        Ok(Evaluation {
            feedback: "AI evaluation requires an API key; rate your answer yourself against the reference material.".to_string(),
            correction: None,
            better_sentence: None,
            score: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunpo_core::Level;

    fn point() -> GrammarPoint {
        GrammarPoint {
            id: 1,
            level: Level::N4,
            concept: "〜そうだ".to_string(),
            meaning: "looks like / I heard".to_string(),
            structure: "stem + そうだ".to_string(),
            explanation: String::new(),
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn test_offline_content_is_deterministic() {
        let a = OfflineTutor.generate(&point()).await.unwrap();
        let b = OfflineTutor.generate(&point()).await.unwrap();
        assert_eq!(a.prompt, b.prompt);
        assert!(a.prompt.contains("〜そうだ"));
        assert!(a.reference_answer.is_none());
    }

    #[tokio::test]
    async fn test_offline_evaluation_scores_zero() {
        let eval = OfflineTutor.evaluate("答え", &point()).await.unwrap();
        assert_eq!(eval.score, 0);
    }
}
