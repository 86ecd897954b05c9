//! Configuration for bunpo.
//!
//! Provider configs live here (not in the provider crates) so that the
//! core `TutorConfig` can aggregate them; the provider crates consume them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TutorError, TutorResult};
use crate::selector::BatchConfig;

/// AI provider configuration (content generation and evaluation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Model identifier.
    pub model: String,
    /// API key. Falls back to the `GEMINI_API_KEY` environment variable;
    /// with neither present the offline provider is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override for the generation API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Language for challenge prompts and feedback.
    pub feedback_language: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 1024,
            feedback_language: "English".to_string(),
        }
    }
}

/// Speech synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// TTS endpoint URL. `None` disables synthesis (cards get no audio).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Voice name passed to the endpoint.
    pub voice: String,
    /// Directory rendered audio files are written to.
    pub output_dir: PathBuf,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            voice: "ja-JP-NanamiNeural".to_string(),
            output_dir: std::env::temp_dir().join("bunpo-audio"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TutorConfig {
    /// AI provider settings.
    pub ai: AiConfig,
    /// Speech synthesis settings.
    pub speech: SpeechConfig,
    /// Batch sizing policy.
    pub batch: BatchConfig,
    /// SQLite database location. Empty means the default location.
    pub database_path: PathBuf,
}

impl TutorConfig {
    /// Default database location: `~/.bunpo/knowledge.db`.
    pub fn default_database_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bunpo")
            .join("knowledge.db")
    }

    /// Resolved database path (configured or default).
    pub fn database_path(&self) -> PathBuf {
        if self.database_path.as_os_str().is_empty() {
            Self::default_database_path()
        } else {
            self.database_path.clone()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> TutorResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&raw).map_err(|e| {
            TutorError::Configuration(format!(
                "Invalid config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Load from the default location (`~/.config/bunpo/config.toml`),
    /// falling back to defaults when the file does not exist.
    pub fn load() -> TutorResult<Self> {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bunpo")
            .join("config.toml");
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
