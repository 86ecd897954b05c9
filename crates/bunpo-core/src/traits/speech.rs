//! Speech synthesis trait.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::TutorResult;

/// Renders text to audio.
///
/// A failure here is a plain [`crate::error::TutorError::Generation`]; the
/// orchestrator treats it like any other generation failure and keeps the
/// card without audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return a handle to the rendered audio file.
    async fn synthesize(&self, text: &str) -> TutorResult<PathBuf>;
}
