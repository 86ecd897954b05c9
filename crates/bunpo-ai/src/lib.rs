//! bunpo-ai - AI provider implementations for bunpo.
//!
//! Implements the [`bunpo_core::ContentProvider`] and
//! [`bunpo_core::Evaluator`] collaborator traits.
//!
//! # Providers
//!
//! - **Gemini** - challenge generation and answer evaluation via the
//!   `generateContent` API in JSON mode.
//! - **Offline** - deterministic fallback content when no API key is
//!   configured.
//!
//! # Example
//!
//! ```ignore
//! use bunpo_ai::TutorFactory;
//! use bunpo_core::AiConfig;
//!
//! let (content, evaluator) = TutorFactory::create(&AiConfig::default())?;
//! ```

mod factory;
mod gemini;
mod json;
mod offline;
mod prompts;

pub use factory::TutorFactory;
pub use gemini::GeminiTutor;
pub use offline::OfflineTutor;

// Re-export core types for convenience
pub use bunpo_core::{AiConfig, ContentProvider, Evaluation, Evaluator, GeneratedContent};
