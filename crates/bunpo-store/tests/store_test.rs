//! On-disk store behavior: persistence across reopen and end-to-end
//! seed/review/export flow.

use bunpo_core::{ProgressStore, Quality, ReviewStatus, ReviewType, ReviewWrite};
use bunpo_store::{export_progress, import_progress, starter_seeds, SqliteStore};
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_progress_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("knowledge.db");
    let now = Utc::now();

    {
        let store = SqliteStore::new(&db_path).unwrap();
        store.seed_grammar_points(&starter_seeds()).unwrap();

        let fresh = store.due_and_new(now, 50).await.unwrap();
        let target = &fresh.new[0];
        store
            .record_review(&ReviewWrite {
                progress_id: target.progress.id,
                grammar_id: target.grammar.id,
                quality: Quality::Perfect,
                review_type: ReviewType::Learn,
                interval_days: 1,
                easiness: 2.6,
                repetition_streak: 1,
                next_due: now - Duration::minutes(5),
            })
            .await
            .unwrap();
    }

    let reopened = SqliteStore::new(&db_path).unwrap();
    let result = reopened.due_and_new(now, 50).await.unwrap();
    assert_eq!(result.due.len(), 1);
    assert_eq!(result.due[0].progress.status, ReviewStatus::Active);
    assert!((result.due[0].progress.easiness - 2.6).abs() < 1e-9);

    let stats = reopened.stats(now).unwrap();
    assert_eq!(stats.total_points, starter_seeds().len() as u64);
    assert_eq!(stats.reviews_logged, 1);
}

#[tokio::test]
async fn test_reseeding_existing_database_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("knowledge.db");

    let store = SqliteStore::new(&db_path).unwrap();
    assert_eq!(
        store.seed_grammar_points(&starter_seeds()).unwrap(),
        starter_seeds().len()
    );
    drop(store);

    let reopened = SqliteStore::new(&db_path).unwrap();
    assert_eq!(reopened.seed_grammar_points(&starter_seeds()).unwrap(), 0);
}

#[tokio::test]
async fn test_export_import_restores_review_state() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("progress.jsonl");
    let now = Utc::now();

    let source = SqliteStore::in_memory().unwrap();
    source.seed_grammar_points(&starter_seeds()).unwrap();
    let fresh = source.due_and_new(now, 50).await.unwrap();
    let target = &fresh.new[0];
    source
        .record_review(&ReviewWrite {
            progress_id: target.progress.id,
            grammar_id: target.grammar.id,
            quality: Quality::Difficult,
            review_type: ReviewType::Learn,
            interval_days: 1,
            easiness: 2.36,
            repetition_streak: 1,
            next_due: now + Duration::days(1),
        })
        .await
        .unwrap();

    export_progress(&source, &snapshot_path).await.unwrap();

    let restored = SqliteStore::in_memory().unwrap();
    restored.seed_grammar_points(&starter_seeds()).unwrap();
    let summary = import_progress(&restored, &snapshot_path).await.unwrap();
    assert_eq!(summary.applied, starter_seeds().len());

    let reviewed = restored
        .snapshot()
        .unwrap()
        .into_iter()
        .find(|c| c.grammar.id == target.grammar.id)
        .unwrap();
    assert_eq!(reviewed.progress.status, ReviewStatus::Active);
    assert_eq!(reviewed.progress.repetition_streak, 1);
    assert!((reviewed.progress.easiness - 2.36).abs() < 1e-9);
}
