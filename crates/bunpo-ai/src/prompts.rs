//! Prompt builders for challenge generation and answer evaluation.

use bunpo_core::GrammarPoint;

/// Build the challenge-generation prompt for one grammar point.
///
/// The model is asked for a translation challenge: a natural Japanese
/// sentence using the target pattern, presented to the learner as a
/// sentence in their own language to translate back.
pub fn challenge_prompt(point: &GrammarPoint, language: &str) -> String {
    format!(
        r#"Task: Create a translation challenge for the Japanese grammar pattern {concept}.

Grammar details:
- Level: {level}
- Meaning: {meaning}
- Structure: {structure}

Requirements:
1. Write one natural Japanese sentence using {concept}.
2. Output its {language} translation as the "question" (the learner will translate it back into Japanese).
3. Explain the grammar nuance being exercised as the "context", in {language}.
4. Provide a short vocabulary hint as the "hint".
5. Put the Japanese sentence itself in "example_sentence".

Output strict JSON only, no markdown:
{{
  "question": "...",
  "context": "...",
  "hint": "...",
  "example_sentence": "..."
}}"#,
        concept = point.concept,
        level = point.level,
        meaning = point.meaning,
        structure = point.structure,
        language = language,
    )
}

/// Build the answer-evaluation prompt.
pub fn evaluation_prompt(point: &GrammarPoint, answer: &str, language: &str) -> String {
    format!(
        r#"Role: Japanese grammar expert.
Task: Evaluate a student's sentence.

Target grammar: {concept} ({meaning})
Student sentence: {answer}

Strict rules:
1. Output strict JSON only. No markdown formatting.
2. No praise, encouragement, or filler text.
3. "feedback" analyzes grammar and logic only, concisely, in {language}.
4. "correction" is the corrected sentence if one is needed, otherwise null.
5. "better_sentence" is one natural native example using {concept}.
6. "score" is an integer 0-5 (5 = flawless, 3 = correct with issues, 0 = does not use the pattern).

Output format:
{{
  "feedback": "...",
  "correction": null,
  "better_sentence": "...",
  "score": 3
}}"#,
        concept = point.concept,
        meaning = point.meaning,
        answer = answer,
        language = language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunpo_core::Level;

    fn point() -> GrammarPoint {
        GrammarPoint {
            id: 1,
            level: Level::N2,
            concept: "〜ざるを得ない".to_string(),
            meaning: "cannot help but".to_string(),
            structure: "V(ない stem) + ざるを得ない".to_string(),
            explanation: String::new(),
            tags: vec![],
        }
    }

    #[test]
    fn test_challenge_prompt_mentions_pattern_and_language() {
        let prompt = challenge_prompt(&point(), "English");
        assert!(prompt.contains("〜ざるを得ない"));
        assert!(prompt.contains("English"));
        assert!(prompt.contains("example_sentence"));
    }

    #[test]
    fn test_evaluation_prompt_embeds_answer() {
        let prompt = evaluation_prompt(&point(), "行かざるを得ない", "English");
        assert!(prompt.contains("行かざるを得ない"));
        assert!(prompt.contains("score"));
    }
}
