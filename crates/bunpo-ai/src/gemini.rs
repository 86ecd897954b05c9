//! Gemini provider: challenge generation and answer evaluation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use bunpo_core::{
    AiConfig, ContentProvider, Evaluation, Evaluator, GeneratedContent, GrammarPoint, TutorError,
    TutorResult,
};

use crate::json::{parse_challenge, parse_evaluation};
use crate::prompts::{challenge_prompt, evaluation_prompt};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-backed tutor implementing both [`ContentProvider`] and
/// [`Evaluator`] over the `generateContent` endpoint in JSON mode.
pub struct GeminiTutor {
    client: Client,
    config: AiConfig,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GeminiTutor {
    /// Create a new Gemini tutor.
    ///
    /// The API key comes from the config or the `GEMINI_API_KEY`
    /// environment variable.
    pub fn new(config: AiConfig) -> TutorResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| {
                TutorError::Configuration(
                    "Gemini API key not found. Set GEMINI_API_KEY or provide api_key in config."
                        .to_string(),
                )
            })?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            api_key
                .parse()
                .map_err(|_| TutorError::Configuration("Invalid API key format".to_string()))?,
        );
        headers.insert(
            "content-type",
            "application/json"
                .parse()
                .map_err(|_| TutorError::Configuration("Invalid content type".to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                TutorError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GEMINI_API_URL.to_string());

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Get the model name.
    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    /// Send one prompt and return the raw text of the first candidate.
    async fn generate_text(&self, prompt: String) -> TutorResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.config.model
        );
        debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TutorError::generation(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TutorError::generation(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.clone());
            return Err(TutorError::generation(format!(
                "Gemini API error ({}): {}",
                status, message
            )));
        }

        let response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| TutorError::generation(format!("Failed to parse response: {}", e)))?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| TutorError::generation("Gemini returned no candidates"))
    }
}

#[async_trait]
impl ContentProvider for GeminiTutor {
    async fn generate(&self, point: &GrammarPoint) -> TutorResult<GeneratedContent> {
        let prompt = challenge_prompt(point, &self.config.feedback_language);
        let text = self.generate_text(prompt).await?;
        parse_challenge(&text)
    }
}

#[async_trait]
impl Evaluator for GeminiTutor {
    async fn evaluate(&self, answer: &str, point: &GrammarPoint) -> TutorResult<Evaluation> {
        let prompt = evaluation_prompt(point, answer, &self.config.feedback_language);
        let text = self.generate_text(prompt).await?;
        parse_evaluation(&text)
    }
}
