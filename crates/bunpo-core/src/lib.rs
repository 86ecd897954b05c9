//! bunpo-core - Core library for bunpo.
//!
//! Provides the types, collaborator traits, SM-2 scheduling engine, and the
//! session orchestrator for the bunpo grammar tutor.
//!
//! # Example
//!
//! ```ignore
//! use bunpo_core::{BatchConfig, DueSetSelector, SessionOrchestrator};
//!
//! let selector = DueSetSelector::new(store.clone(), BatchConfig::default());
//! let mut session = SessionOrchestrator::new(selector, store, content, evaluator, speech);
//!
//! let prepared = session.prepare_session(|done, total| {
//!     println!("preparing {}/{}", done, total);
//! }).await?;
//!
//! while let Some(card) = session.current_card() {
//!     let evaluation = session.submit_answer("私の答え").await?;
//!     session.rate(4).await?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod selector;
pub mod session;
pub mod srs;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{AiConfig, SpeechConfig, TutorConfig};
pub use error::{ErrorCode, TutorError, TutorResult};
pub use selector::{BatchConfig, BatchPlan, DueSetSelector};
pub use session::{Phase, SessionOrchestrator, SessionState};
pub use srs::{Quality, ReviewUpdate, SrsEngine};
pub use traits::{
    ContentProvider, Evaluation, Evaluator, GeneratedContent, ProgressStore, SpeechSynthesizer,
};
pub use types::{
    Candidate, DueAndNew, GrammarPoint, GrammarSeed, Level, ProgressRecord, ReviewLogEntry,
    ReviewStatus, ReviewType, ReviewWrite, SessionCard,
};
