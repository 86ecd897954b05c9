//! Core types for bunpo.

mod card;
mod grammar;
mod progress;

pub use card::SessionCard;
pub use grammar::{GrammarPoint, GrammarSeed, Level};
pub use progress::{
    Candidate, DueAndNew, ProgressRecord, ReviewLogEntry, ReviewStatus, ReviewType, ReviewWrite,
};
