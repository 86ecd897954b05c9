//! SQLite-backed progress store.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use bunpo_core::{
    Candidate, DueAndNew, GrammarPoint, GrammarSeed, Level, ProgressRecord, ProgressStore,
    Quality, ReviewStatus, ReviewWrite, TutorError, TutorResult,
};

fn db_err(e: rusqlite::Error) -> TutorError {
    TutorError::database(e.to_string())
}

/// Aggregate figures for the `stats` command.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total_points: u64,
    pub new_points: u64,
    pub active_points: u64,
    pub due_now: u64,
    pub reviews_logged: u64,
    /// Mean repetition streak across items in rotation (0 when none).
    pub average_streak: f64,
    /// Mean quality across all logged reviews (0 when none).
    pub average_quality: f64,
}

/// SQLite store holding grammar points, per-point scheduling state, and
/// the append-only review log.
///
/// One progress row exists per grammar point, created at seed time.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: impl AsRef<Path>) -> TutorResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(db_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> TutorResult<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> TutorResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS grammar_points (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level TEXT NOT NULL,
                concept TEXT NOT NULL,
                meaning TEXT NOT NULL DEFAULT '',
                structure TEXT NOT NULL DEFAULT '',
                explanation TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '[]',
                UNIQUE(level, concept)
            );

            CREATE TABLE IF NOT EXISTS user_progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                grammar_id INTEGER NOT NULL UNIQUE,
                status TEXT NOT NULL DEFAULT 'new',
                interval_days INTEGER NOT NULL DEFAULT 0,
                easiness REAL NOT NULL DEFAULT 2.5,
                repetition_streak INTEGER NOT NULL DEFAULT 0,
                next_due TEXT,
                FOREIGN KEY (grammar_id) REFERENCES grammar_points(id)
            );

            CREATE INDEX IF NOT EXISTS idx_progress_status ON user_progress(status);
            CREATE INDEX IF NOT EXISTS idx_progress_due ON user_progress(next_due);

            CREATE TABLE IF NOT EXISTS review_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                grammar_id INTEGER NOT NULL,
                quality INTEGER NOT NULL,
                review_type TEXT NOT NULL,
                reviewed_at TEXT NOT NULL,
                FOREIGN KEY (grammar_id) REFERENCES grammar_points(id)
            );

            CREATE INDEX IF NOT EXISTS idx_logs_grammar ON review_logs(grammar_id);
            CREATE INDEX IF NOT EXISTS idx_logs_time ON review_logs(reviewed_at);
        "#,
        )
        .map_err(db_err)?;
        Ok(())
    }

    /// Insert seed grammar points, skipping entries already present
    /// (keyed by level + concept). Each inserted point gets a fresh
    /// progress row. Returns the number of points added.
    pub fn seed_grammar_points(&self, seeds: &[GrammarSeed]) -> TutorResult<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(db_err)?;
        let mut added = 0usize;

        for seed in seeds {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM grammar_points WHERE level = ?1 AND concept = ?2",
                    params![seed.level.as_str(), seed.concept],
                    |row| row.get(0),
                )
                .optional()
                .map_err(db_err)?;
            if existing.is_some() {
                continue;
            }

            let tags = serde_json::to_string(&seed.tags)?;
            tx.execute(
                r#"INSERT INTO grammar_points (level, concept, meaning, structure, explanation, tags)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                params![
                    seed.level.as_str(),
                    seed.concept,
                    seed.meaning,
                    seed.structure,
                    seed.explanation,
                    tags,
                ],
            )
            .map_err(db_err)?;
            let grammar_id = tx.last_insert_rowid();
            tx.execute(
                "INSERT INTO user_progress (grammar_id) VALUES (?1)",
                params![grammar_id],
            )
            .map_err(db_err)?;
            added += 1;
        }

        tx.commit().map_err(db_err)?;
        info!(added, skipped = seeds.len() - added, "seeded grammar points");
        Ok(added)
    }

    /// List grammar points, optionally filtered by level, ordered by
    /// level rank then id.
    pub fn list_grammar(&self, level: Option<Level>) -> TutorResult<Vec<GrammarPoint>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                r#"SELECT id, level, concept, meaning, structure, explanation, tags
                   FROM grammar_points
                   WHERE (?1 IS NULL OR level = ?1)
                   ORDER BY id"#,
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![level.map(|l| l.as_str())], |row| {
                Ok(Self::row_to_grammar(row))
            })
            .map_err(db_err)?;

        let mut points: Vec<GrammarPoint> = rows
            .map(|r| r.map_err(db_err).and_then(|inner| inner))
            .collect::<TutorResult<_>>()?;
        points.sort_by(|a, b| {
            a.level
                .rank()
                .cmp(&b.level.rank())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(points)
    }

    /// Aggregate counts across the three tables.
    pub fn stats(&self, now: DateTime<Utc>) -> TutorResult<StoreStats> {
        let conn = self.conn.lock().unwrap();
        let count = |sql: &str, p: &[&dyn rusqlite::ToSql]| -> TutorResult<u64> {
            conn.query_row(sql, p, |row| row.get(0)).map_err(db_err)
        };
        let average = |sql: &str| -> TutorResult<f64> {
            conn.query_row(sql, [], |row| row.get(0)).map_err(db_err)
        };

        Ok(StoreStats {
            total_points: count("SELECT COUNT(*) FROM grammar_points", &[])?,
            new_points: count("SELECT COUNT(*) FROM user_progress WHERE status = 'new'", &[])?,
            active_points: count(
                "SELECT COUNT(*) FROM user_progress WHERE status = 'active'",
                &[],
            )?,
            due_now: count(
                "SELECT COUNT(*) FROM user_progress WHERE status = 'active' AND next_due <= ?1",
                &[&now.to_rfc3339()],
            )?,
            reviews_logged: count("SELECT COUNT(*) FROM review_logs", &[])?,
            average_streak: average(
                "SELECT COALESCE(AVG(repetition_streak), 0.0) FROM user_progress WHERE status = 'active'",
            )?,
            average_quality: average("SELECT COALESCE(AVG(quality), 0.0) FROM review_logs")?,
        })
    }

    /// Full progress snapshot joined with grammar, for export.
    pub fn snapshot(&self) -> TutorResult<Vec<Candidate>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "{CANDIDATE_SELECT} ORDER BY g.id"
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![], |row| Ok(Self::row_to_candidate(row)))
            .map_err(db_err)?;
        rows.map(|r| r.map_err(db_err).and_then(|inner| inner))
            .collect()
    }

    /// Overwrite the scheduling state of the point identified by
    /// level + concept. Returns false when no such point exists.
    pub fn restore_progress(
        &self,
        level: Level,
        concept: &str,
        progress: &ImportedProgress,
    ) -> TutorResult<bool> {
        let conn = self.conn.lock().unwrap();
        let updated = conn
            .execute(
                r#"UPDATE user_progress SET
                       status = ?3, interval_days = ?4, easiness = ?5,
                       repetition_streak = ?6, next_due = ?7
                   WHERE grammar_id =
                       (SELECT id FROM grammar_points WHERE level = ?1 AND concept = ?2)"#,
                params![
                    level.as_str(),
                    concept,
                    progress.status.as_str(),
                    progress.interval_days,
                    progress.easiness,
                    progress.repetition_streak,
                    progress.next_due.map(|dt| dt.to_rfc3339()),
                ],
            )
            .map_err(db_err)?;
        Ok(updated == 1)
    }

    fn row_to_grammar(row: &rusqlite::Row<'_>) -> TutorResult<GrammarPoint> {
        let level: String = row.get(1).map_err(db_err)?;
        let tags: String = row.get(6).map_err(db_err)?;
        Ok(GrammarPoint {
            id: row.get(0).map_err(db_err)?,
            level: level.parse()?,
            concept: row.get(2).map_err(db_err)?,
            meaning: row.get(3).map_err(db_err)?,
            structure: row.get(4).map_err(db_err)?,
            explanation: row.get(5).map_err(db_err)?,
            tags: serde_json::from_str(&tags)?,
        })
    }

    fn row_to_candidate(row: &rusqlite::Row<'_>) -> TutorResult<Candidate> {
        let grammar = Self::row_to_grammar(row)?;
        let status: String = row.get(8).map_err(db_err)?;
        let next_due: Option<String> = row.get(12).map_err(db_err)?;
        let progress = ProgressRecord {
            id: row.get(7).map_err(db_err)?,
            grammar_id: grammar.id,
            status: parse_status(&status)?,
            interval_days: row.get(9).map_err(db_err)?,
            easiness: row.get(10).map_err(db_err)?,
            repetition_streak: row.get(11).map_err(db_err)?,
            next_due: next_due.map(|s| parse_timestamp(&s)).transpose()?,
        };
        Ok(Candidate { grammar, progress })
    }
}

const CANDIDATE_SELECT: &str = r#"SELECT g.id, g.level, g.concept, g.meaning, g.structure, g.explanation, g.tags,
       p.id, p.status, p.interval_days, p.easiness, p.repetition_streak, p.next_due
  FROM grammar_points g JOIN user_progress p ON p.grammar_id = g.id"#;

/// Scheduling state as carried in an export file.
#[derive(Debug, Clone)]
pub struct ImportedProgress {
    pub status: ReviewStatus,
    pub interval_days: u32,
    pub easiness: f64,
    pub repetition_streak: u32,
    pub next_due: Option<DateTime<Utc>>,
}

fn parse_status(s: &str) -> TutorResult<ReviewStatus> {
    match s {
        "new" => Ok(ReviewStatus::New),
        "active" => Ok(ReviewStatus::Active),
        other => Err(TutorError::parse(format!(
            "Unknown progress status: '{}'",
            other
        ))),
    }
}

fn parse_timestamp(s: &str) -> TutorResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TutorError::parse(format!("Invalid timestamp '{}': {}", s, e)))
}

#[async_trait]
impl ProgressStore for SqliteStore {
    async fn due_and_new(&self, now: DateTime<Utc>, limit: usize) -> TutorResult<DueAndNew> {
        let conn = self.conn.lock().unwrap();

        let mut due_stmt = conn
            .prepare(&format!(
                "{CANDIDATE_SELECT} WHERE p.status = 'active' AND p.next_due <= ?1
                 ORDER BY p.next_due LIMIT ?2"
            ))
            .map_err(db_err)?;
        let due = due_stmt
            .query_map(params![now.to_rfc3339(), limit as i64], |row| {
                Ok(Self::row_to_candidate(row))
            })
            .map_err(db_err)?
            .map(|r| r.map_err(db_err).and_then(|inner| inner))
            .collect::<TutorResult<Vec<_>>>()?;

        let mut new_stmt = conn
            .prepare(&format!(
                "{CANDIDATE_SELECT} WHERE p.status = 'new' ORDER BY g.id LIMIT ?1"
            ))
            .map_err(db_err)?;
        let new = new_stmt
            .query_map(params![limit as i64], |row| Ok(Self::row_to_candidate(row)))
            .map_err(db_err)?
            .map(|r| r.map_err(db_err).and_then(|inner| inner))
            .collect::<TutorResult<Vec<_>>>()?;

        debug!(due = due.len(), new = new.len(), "candidate query");
        Ok(DueAndNew { due, new })
    }

    async fn record_review(&self, write: &ReviewWrite) -> TutorResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(db_err)?;

        let updated = tx
            .execute(
                r#"UPDATE user_progress SET
                       status = 'active', interval_days = ?2, easiness = ?3,
                       repetition_streak = ?4, next_due = ?5
                   WHERE id = ?1"#,
                params![
                    write.progress_id,
                    write.interval_days,
                    write.easiness,
                    write.repetition_streak,
                    write.next_due.to_rfc3339(),
                ],
            )
            .map_err(db_err)?;
        if updated != 1 {
            return Err(TutorError::database(format!(
                "No progress record with id {}",
                write.progress_id
            )));
        }

        tx.execute(
            r#"INSERT INTO review_logs (grammar_id, quality, review_type, reviewed_at)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![
                write.grammar_id,
                write.quality.to_rating(),
                write.review_type.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(())
    }
}
