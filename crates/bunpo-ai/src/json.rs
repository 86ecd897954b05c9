//! JSON parsing utilities for LLM responses.
//!
//! Models are asked for strict JSON, but responses still arrive wrapped in
//! code fences or with stray prose often enough that parsing goes through
//! these normalizers first.

use regex::Regex;
use serde::Deserialize;

use bunpo_core::{GeneratedContent, TutorError, TutorResult};

/// Strip a surrounding ```/```json code fence, if present.
pub fn remove_code_fences(content: &str) -> String {
    let content = content.trim();
    let fence_re = Regex::new(r"^```[a-zA-Z0-9]*\n?([\s\S]*?)\n?```$").unwrap();
    fence_re
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| content.to_string())
}

/// Extract the outermost JSON object from text that may carry leading or
/// trailing prose.
pub fn extract_json(text: &str) -> TutorResult<String> {
    let cleaned = remove_code_fences(text);
    if cleaned.starts_with('{') {
        return Ok(cleaned);
    }
    let start = cleaned
        .find('{')
        .ok_or_else(|| TutorError::parse("No JSON object in response"))?;
    let end = cleaned
        .rfind('}')
        .ok_or_else(|| TutorError::parse("Unterminated JSON object in response"))?;
    if end < start {
        return Err(TutorError::parse("Malformed JSON object in response"));
    }
    Ok(cleaned[start..=end].to_string())
}

/// Challenge content as the model emits it.
#[derive(Debug, Deserialize)]
pub struct ChallengePayload {
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub example_sentence: Option<String>,
}

/// Parse a generated challenge from an LLM response.
pub fn parse_challenge(response: &str) -> TutorResult<GeneratedContent> {
    let json = extract_json(response)?;
    let payload: ChallengePayload = serde_json::from_str(&json)
        .map_err(|e| TutorError::parse(format!("Invalid challenge JSON: {}", e)))?;
    if payload.question.trim().is_empty() {
        return Err(TutorError::parse("Challenge question is empty"));
    }
    Ok(GeneratedContent {
        prompt: payload.question,
        context: payload.context.filter(|s| !s.trim().is_empty()),
        hint: payload.hint.filter(|s| !s.trim().is_empty()),
        reference_answer: payload.example_sentence.filter(|s| !s.trim().is_empty()),
    })
}

/// Evaluation result as the model emits it.
#[derive(Debug, Deserialize)]
pub struct EvaluationPayload {
    pub feedback: String,
    #[serde(default)]
    pub correction: Option<String>,
    #[serde(default)]
    pub better_sentence: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Parse an evaluation from an LLM response. The score is normalized into
/// 0..=5; a missing score becomes 0 rather than a silent pass.
pub fn parse_evaluation(response: &str) -> TutorResult<bunpo_core::Evaluation> {
    let json = extract_json(response)?;
    let payload: EvaluationPayload = serde_json::from_str(&json)
        .map_err(|e| TutorError::parse(format!("Invalid evaluation JSON: {}", e)))?;
    let score = payload
        .score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 5.0) as u8)
        .unwrap_or(0);
    Ok(bunpo_core::Evaluation {
        feedback: payload.feedback,
        correction: payload.correction.filter(|s| !s.trim().is_empty()),
        better_sentence: payload.better_sentence.filter(|s| !s.trim().is_empty()),
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_code_fences() {
        assert_eq!(remove_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(remove_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_extract_json_with_prose() {
        let text = "Here is your challenge:\n{\"question\": \"translate\"} hope it helps";
        assert_eq!(extract_json(text).unwrap(), "{\"question\": \"translate\"}");
    }

    #[test]
    fn test_extract_json_missing_object() {
        assert!(extract_json("no json here").is_err());
    }

    #[test]
    fn test_parse_challenge_full() {
        let content = parse_challenge(
            r#"{"question":"Translate: 行くしかない","context":"no choice but to",
                "hint":"しかない","example_sentence":"もう行くしかない。"}"#,
        )
        .unwrap();
        assert_eq!(content.prompt, "Translate: 行くしかない");
        assert_eq!(content.reference_answer.as_deref(), Some("もう行くしかない。"));
    }

    #[test]
    fn test_parse_challenge_blank_optionals_dropped() {
        let content =
            parse_challenge(r#"{"question":"q","context":"","hint":"  "}"#).unwrap();
        assert!(content.context.is_none());
        assert!(content.hint.is_none());
        assert!(content.reference_answer.is_none());
    }

    #[test]
    fn test_parse_challenge_empty_question_rejected() {
        assert!(parse_challenge(r#"{"question":"  "}"#).is_err());
    }

    #[test]
    fn test_parse_evaluation_score_normalization() {
        let eval = parse_evaluation(r#"{"feedback":"ok","score":4.6}"#).unwrap();
        assert_eq!(eval.score, 5);

        let eval = parse_evaluation(r#"{"feedback":"ok","score":-2}"#).unwrap();
        assert_eq!(eval.score, 0);

        let eval = parse_evaluation(r#"{"feedback":"ok"}"#).unwrap();
        assert_eq!(eval.score, 0);
    }

    #[test]
    fn test_parse_evaluation_fenced() {
        let eval = parse_evaluation(
            "```json\n{\"feedback\":\"particle misuse\",\"correction\":\"直した文\",\"score\":3}\n```",
        )
        .unwrap();
        assert_eq!(eval.score, 3);
        assert_eq!(eval.correction.as_deref(), Some("直した文"));
    }
}
