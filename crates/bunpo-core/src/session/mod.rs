//! Interactive review session: state machine and orchestrator.

mod orchestrator;
mod state;

pub use orchestrator::SessionOrchestrator;
pub use state::{Phase, SessionState};
