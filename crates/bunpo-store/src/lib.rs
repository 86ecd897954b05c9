//! bunpo-store - SQLite persistence for bunpo.
//!
//! Implements the [`bunpo_core::ProgressStore`] trait over a single SQLite
//! database holding three tables: immutable grammar points, one scheduling
//! row per point, and an append-only review log. Rating writes update the
//! scheduling row and append the log entry in one transaction.

mod export;
mod seed;
mod sqlite;

pub use export::{export_progress, import_progress, ImportSummary, ProgressExportEntry};
pub use seed::{load_seed_file, starter_seeds};
pub use sqlite::{ImportedProgress, SqliteStore, StoreStats};
