//! Progress export and import in JSON Lines format.
//!
//! One line per grammar point, keyed by level + concept rather than database
//! id, so a snapshot survives reseeding into a fresh database.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use bunpo_core::{Level, ReviewStatus, TutorError, TutorResult};

use crate::sqlite::{ImportedProgress, SqliteStore};

/// One exported progress line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressExportEntry {
    pub level: Level,
    pub concept: String,
    pub status: ReviewStatus,
    pub interval_days: u32,
    pub easiness: f64,
    pub repetition_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<DateTime<Utc>>,
}

/// Outcome of an import run.
#[derive(Debug, Default, Clone)]
pub struct ImportSummary {
    /// Lines read from the file.
    pub total: usize,
    /// Entries applied to a matching grammar point.
    pub applied: usize,
    /// Entries whose level + concept matched nothing in this database.
    pub missing: usize,
    /// Malformed lines, skipped with a warning.
    pub malformed: usize,
}

/// Export all progress records to a JSON Lines file. Returns the number of
/// entries written.
pub async fn export_progress(store: &SqliteStore, path: impl AsRef<Path>) -> TutorResult<usize> {
    let candidates = store.snapshot()?;
    let mut file = tokio::fs::File::create(path.as_ref()).await?;

    for candidate in &candidates {
        let entry = ProgressExportEntry {
            level: candidate.grammar.level,
            concept: candidate.grammar.concept.clone(),
            status: candidate.progress.status,
            interval_days: candidate.progress.interval_days,
            easiness: candidate.progress.easiness,
            repetition_streak: candidate.progress.repetition_streak,
            next_due: candidate.progress.next_due,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
    }

    file.flush().await?;
    Ok(candidates.len())
}

/// Import a progress snapshot, overwriting the scheduling state of every
/// matching grammar point. Malformed lines and unknown points are counted
/// and skipped; they never abort the run.
pub async fn import_progress(
    store: &SqliteStore,
    path: impl AsRef<Path>,
) -> TutorResult<ImportSummary> {
    let file = tokio::fs::File::open(path.as_ref()).await.map_err(|e| {
        TutorError::validation(format!(
            "Cannot open import file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let mut lines = BufReader::new(file).lines();
    let mut summary = ImportSummary::default();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        summary.total += 1;

        let entry: ProgressExportEntry = match serde_json::from_str(&line) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(line = summary.total, error = %e, "skipping malformed import line");
                summary.malformed += 1;
                continue;
            }
        };

        let progress = ImportedProgress {
            status: entry.status,
            interval_days: entry.interval_days,
            easiness: entry.easiness,
            repetition_streak: entry.repetition_streak,
            next_due: entry.next_due,
        };
        if store.restore_progress(entry.level, &entry.concept, &progress)? {
            summary.applied += 1;
        } else {
            warn!(concept = %entry.concept, "import entry matches no grammar point");
            summary.missing += 1;
        }
    }

    Ok(summary)
}
