use std::path::PathBuf;

use async_trait::async_trait;

use bunpo_core::{SpeechSynthesizer, TutorError, TutorResult};

/// Synthesizer used when no TTS endpoint is configured. Every call fails,
/// which the session pipeline treats as "card without audio".
pub struct NullSynthesizer;

#[async_trait]
impl SpeechSynthesizer for NullSynthesizer {
    async fn synthesize(&self, _text: &str) -> TutorResult<PathBuf> {
        Err(TutorError::speech("speech synthesis is disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_synthesizer_always_fails() {
        let err = NullSynthesizer.synthesize("text").await.unwrap_err();
        assert_eq!(err.code().as_str(), "GEN_003");
    }
}
