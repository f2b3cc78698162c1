//! Integration tests for the punchcard store, lifecycle, and aggregation.
//!
//! These run against an in-memory SQLite database and exercise the same
//! paths the CLI and dashboard use.

use chrono::{Duration, Utc};
use punchcard_core::sessions::{self, FinishOutcome};
use punchcard_core::stats::{PeriodStats, OTHER_LABEL};
use punchcard_core::{Database, Period};

fn open_db() -> Database {
    let db = Database::open_in_memory().expect("in-memory db");
    db.migrate().expect("migrations");
    db
}

// ============================================
// Store on disk
// ============================================

#[test]
fn test_file_backed_store_persists_across_handles() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested/sessions.db");
    let timeout = std::time::Duration::from_secs(5);

    {
        let db = Database::open(&path, timeout).unwrap();
        db.migrate().unwrap();
        sessions::start_session(&db, "persisted").unwrap();
    }

    // Missing parent directories were created, and the data survives reopen
    let db = Database::open(&path, timeout).unwrap();
    db.migrate().unwrap();
    let active = db.active_sessions().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "persisted");
}

// ============================================
// Lifecycle
// ============================================

#[test]
fn test_start_always_increments_active_count() {
    let db = open_db();
    assert_eq!(db.num_active().unwrap(), 0);

    sessions::start_session(&db, "meeting").unwrap();
    assert_eq!(db.num_active().unwrap(), 1);

    // Duplicate names are allowed and still add one active session each
    sessions::start_session(&db, "meeting").unwrap();
    assert_eq!(db.num_active().unwrap(), 2);

    sessions::start_session(&db, "").unwrap();
    assert_eq!(db.num_active().unwrap(), 3);
}

#[test]
fn test_finish_with_nothing_running_is_reported_not_an_error() {
    let db = open_db();
    let outcome = sessions::finish_sessions(&db, "").unwrap();
    assert_eq!(outcome, FinishOutcome::NothingRunning);

    let outcome = sessions::finish_sessions(&db, "missing").unwrap();
    assert_eq!(outcome, FinishOutcome::NothingRunning);
}

#[test]
fn test_finish_by_name_leaves_other_sessions_running() {
    let db = open_db();
    sessions::start_session(&db, "coding").unwrap();
    sessions::start_session(&db, "meeting").unwrap();

    let outcome = sessions::finish_sessions(&db, "coding").unwrap();
    assert!(matches!(outcome, FinishOutcome::Finished { .. }));
    assert_eq!(db.num_active().unwrap(), 1);
    assert_eq!(db.active_sessions().unwrap()[0].name, "meeting");
}

#[test]
fn test_finish_empty_and_all_sentinel_are_equivalent() {
    let db = open_db();
    sessions::start_session(&db, "a").unwrap();
    sessions::start_session(&db, "b").unwrap();
    let outcome = sessions::finish_sessions(&db, "").unwrap();
    assert_eq!(outcome, FinishOutcome::FinishedMany { count: 2 });
    assert_eq!(db.num_active().unwrap(), 0);

    sessions::start_session(&db, "a").unwrap();
    sessions::start_session(&db, "b").unwrap();
    let outcome = sessions::finish_sessions(&db, "all").unwrap();
    assert_eq!(outcome, FinishOutcome::FinishedMany { count: 2 });
    assert_eq!(db.num_active().unwrap(), 0);
}

#[test]
fn test_single_finish_reports_duration_via_set_difference() {
    let db = open_db();
    // Seed an active session that started 40 minutes ago
    let start = Utc::now() - Duration::minutes(40);
    db.insert_session("writing", start, None).unwrap();

    let outcome = sessions::finish_sessions(&db, "writing").unwrap();
    match outcome {
        FinishOutcome::Finished { duration: Some(d) } => {
            assert!((39..=41).contains(&d.num_minutes()), "duration was {d}");
        }
        other => panic!("expected single finish with duration, got {other:?}"),
    }
}

#[test]
fn test_end_to_end_writing_editing_scenario() {
    let db = open_db();
    let now = Utc::now();

    // start "writing" at T0, "editing" at T0+10m; both active
    db.insert_session("writing", now - Duration::minutes(40), None)
        .unwrap();
    db.insert_session("editing", now - Duration::minutes(30), None)
        .unwrap();
    assert_eq!(db.num_active().unwrap(), 2);

    // finish "writing" at T0+40m: one session, ~40 minute duration
    let outcome = sessions::finish_sessions(&db, "writing").unwrap();
    match outcome {
        FinishOutcome::Finished { duration: Some(d) } => {
            assert!((39..=41).contains(&d.num_minutes()));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(db.num_active().unwrap(), 1);

    // finish "all": the one remaining session finishes
    let outcome = sessions::finish_sessions(&db, "all").unwrap();
    assert!(matches!(outcome, FinishOutcome::Finished { .. }));
    assert_eq!(db.num_active().unwrap(), 0);
}

// ============================================
// Aggregation
// ============================================

#[test]
fn test_period_stats_over_store() {
    let db = open_db();
    let now = Utc::now();

    let hour = Duration::hours(1);
    db.insert_session("deep work", now - Duration::days(2), Some(now - Duration::days(2) + hour))
        .unwrap();
    db.insert_session("email", now - Duration::days(10), Some(now - Duration::days(10) + hour))
        .unwrap();
    db.insert_session("running now", now, None).unwrap();

    let week = PeriodStats::collect(&db, Period::Week, now).unwrap();
    assert_eq!(week.completed, 1);
    assert_eq!(week.active, 0);
    assert_eq!(week.total, hour);

    let all = PeriodStats::collect(&db, Period::All, now).unwrap();
    assert_eq!(all.completed, 2);
    assert_eq!(all.active, 1);
    assert_eq!(all.total, Duration::hours(2));
}

#[test]
fn test_breakdown_from_store_with_eight_names() {
    let db = open_db();
    let now = Utc::now();

    for i in 0..8 {
        let start = now - Duration::hours(3);
        let minutes = 80 - 10 * i;
        db.insert_session(
            &format!("task-{i}"),
            start,
            Some(start + Duration::minutes(minutes)),
        )
        .unwrap();
    }

    let stats = PeriodStats::collect(&db, Period::All, now).unwrap();
    assert_eq!(stats.breakdown.len(), 6);
    assert_eq!(stats.breakdown[5].name, OTHER_LABEL);
    assert_eq!(stats.breakdown[5].minutes, 30.0 + 20.0 + 10.0);
}

#[test]
fn test_empty_store_aggregates_to_zero() {
    let db = open_db();
    let now = Utc::now();
    for period in Period::ALL {
        let stats = PeriodStats::collect(&db, period, now).unwrap();
        assert_eq!(stats.sessions.len(), 0);
        assert_eq!(stats.total, Duration::zero());
        assert!(stats.breakdown.is_empty());
    }
}
