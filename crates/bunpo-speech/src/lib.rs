//! bunpo-speech - Speech synthesis for bunpo.
//!
//! Implements the [`bunpo_core::SpeechSynthesizer`] collaborator trait.
//! Synthesis is a plain async call; failures are ordinary generation errors
//! the session orchestrator absorbs by keeping the card without audio.

mod http;
mod null;

use std::sync::Arc;

use tracing::info;

use bunpo_core::{SpeechConfig, SpeechSynthesizer, TutorResult};

pub use http::HttpSynthesizer;
pub use null::NullSynthesizer;

/// Create a synthesizer from config: HTTP-backed when an endpoint is
/// configured, otherwise the disabled synthesizer.
pub fn create_synthesizer(config: &SpeechConfig) -> TutorResult<Arc<dyn SpeechSynthesizer>> {
    if config.endpoint.is_some() {
        Ok(Arc::new(HttpSynthesizer::new(config)?))
    } else {
        info!("no TTS endpoint configured; audio disabled");
        Ok(Arc::new(NullSynthesizer))
    }
}

/// Remove rendered audio from a previous run.
///
/// Audio handles are session-scoped, so the output directory is wiped when
/// a new run starts.
pub async fn clear_output_dir(config: &SpeechConfig) -> TutorResult<()> {
    match tokio::fs::remove_dir_all(&config.output_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(&config.output_dir).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_defaults_to_null() {
        let config = SpeechConfig::default();
        assert!(config.endpoint.is_none());
        let synth = create_synthesizer(&config).unwrap();
        assert!(synth.synthesize("こんにちは").await.is_err());
    }

    #[tokio::test]
    async fn test_clear_output_dir_recreates_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpeechConfig {
            endpoint: None,
            voice: "ja-JP-NanamiNeural".to_string(),
            output_dir: dir.path().join("audio"),
        };

        tokio::fs::create_dir_all(&config.output_dir).await.unwrap();
        tokio::fs::write(config.output_dir.join("stale.mp3"), b"x")
            .await
            .unwrap();

        clear_output_dir(&config).await.unwrap();
        assert!(config.output_dir.exists());
        let mut entries = tokio::fs::read_dir(&config.output_dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_http_synthesizer_requires_endpoint() {
        assert!(HttpSynthesizer::new(&SpeechConfig::default()).is_err());
    }
}
