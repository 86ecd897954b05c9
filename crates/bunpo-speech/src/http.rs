//! HTTP TTS endpoint synthesizer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use bunpo_core::{SpeechConfig, SpeechSynthesizer, TutorError, TutorResult};

/// Synthesizer backed by an HTTP TTS service.
///
/// POSTs `{text, voice}` to the configured endpoint and writes the returned
/// MP3 bytes into the managed output directory. One file per request,
/// UUID-named, so handles never collide within a session.
pub struct HttpSynthesizer {
    client: Client,
    endpoint: String,
    voice: String,
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

impl HttpSynthesizer {
    /// Create a synthesizer from config. Fails when no endpoint is set.
    pub fn new(config: &SpeechConfig) -> TutorResult<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            TutorError::Configuration("Speech endpoint not configured".to_string())
        })?;
        let client = Client::builder().build().map_err(|e| {
            TutorError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self {
            client,
            endpoint,
            voice: config.voice.clone(),
            output_dir: config.output_dir.clone(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> TutorResult<PathBuf> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SynthesisRequest {
                text,
                voice: &self.voice,
            })
            .send()
            .await
            .map_err(|e| TutorError::speech(format!("TTS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TutorError::speech(format!(
                "TTS endpoint returned {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TutorError::speech(format!("Failed to read TTS response: {}", e)))?;
        if bytes.is_empty() {
            return Err(TutorError::speech("TTS endpoint returned no audio"));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{}.mp3", Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "audio rendered");
        Ok(path)
    }
}
