//! Factory for creating the AI tutor providers.

use std::sync::Arc;

use tracing::info;

use bunpo_core::{AiConfig, ContentProvider, Evaluator, TutorResult};

use crate::gemini::GeminiTutor;
use crate::offline::OfflineTutor;

/// Factory for creating the content provider / evaluator pair.
pub struct TutorFactory;

impl TutorFactory {
    /// Create the provider pair from configuration.
    ///
    /// With an API key (config or `GEMINI_API_KEY`) both roles are served
    /// by one Gemini client; without one, the deterministic offline tutor
    /// is used.
    pub fn create(
        config: &AiConfig,
    ) -> TutorResult<(Arc<dyn ContentProvider>, Arc<dyn Evaluator>)> {
        let has_key = config.api_key.is_some() || std::env::var("GEMINI_API_KEY").is_ok();
        if has_key {
            let tutor = Arc::new(GeminiTutor::new(config.clone())?);
            info!(model = tutor.model_name(), "using Gemini tutor");
            Ok((tutor.clone(), tutor))
        } else {
            info!("no API key configured; using offline tutor");
            let tutor = Arc::new(OfflineTutor);
            Ok((tutor.clone(), tutor))
        }
    }
}
