//! Collaborator traits consumed by the session orchestrator.

mod content;
mod evaluate;
mod speech;
mod store;

pub use content::{ContentProvider, GeneratedContent};
pub use evaluate::{Evaluation, Evaluator};
pub use speech::SpeechSynthesizer;
pub use store::ProgressStore;
