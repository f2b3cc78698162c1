//! Session lifecycle: starting and finishing recorded work sessions.
//!
//! Starting is always permitted; overlapping sessions with the same or
//! different names are a supported way of working (e.g. "meeting" and
//! "coding" running together). Finishing is a single bulk UPDATE scoped by
//! name, or to every active session for the `all` sentinel.

use crate::db::Database;
use crate::error::Result;
use crate::types::Session;
use chrono::{DateTime, Duration, Utc};

/// Sentinel name that finishes every active session.
pub const FINISH_ALL: &str = "all";

/// Receipt for a newly started session.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedSession {
    /// Store-assigned id
    pub id: i64,
    /// Start timestamp, returned for display
    pub start: DateTime<Utc>,
}

/// Outcome of a finish operation, keyed by the affected-row count.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// No matching active session. A reportable condition, not an error.
    NothingRunning,
    /// Exactly one session finished. The duration is recovered from the
    /// before/after active-set difference and is `None` only if that
    /// difference was inconsistent (see [`finish_sessions`]).
    Finished { duration: Option<Duration> },
    /// Several sessions finished at once; no per-session duration.
    FinishedMany { count: usize },
}

/// Start a new session named `name` (empty = unnamed) at the current time.
pub fn start_session(db: &Database, name: &str) -> Result<StartedSession> {
    let start = Utc::now();
    let id = db.insert_session(name, start, None)?;
    tracing::info!(id, name, %start, "Started session");
    Ok(StartedSession { id, start })
}

/// Finish active sessions.
///
/// An empty `name` or the [`FINISH_ALL`] sentinel finishes every active
/// session; otherwise only active sessions whose name matches exactly.
///
/// The finish is one bulk UPDATE, so the store does not hand back the prior
/// start time of the row it touched. When exactly one row was affected, the
/// finished session is identified as the one present in the active set read
/// just before the update and absent from the set read just after, saving a
/// by-id round trip. The two reads and the update are not wrapped in a
/// transaction; a concurrent writer could skew the reported duration. That
/// window is accepted for a single-user, single-process tool.
pub fn finish_sessions(db: &Database, name: &str) -> Result<FinishOutcome> {
    let filter = match name {
        "" | FINISH_ALL => None,
        other => Some(other),
    };

    let before = db.active_sessions()?;
    let finish = Utc::now();
    let affected = db.finish_active(filter, finish)?;

    let outcome = match affected {
        0 => FinishOutcome::NothingRunning,
        1 => {
            let after = db.active_sessions()?;
            let duration = diff_finished(&before, &after).map(|s| finish - s.start);
            FinishOutcome::Finished { duration }
        }
        count => FinishOutcome::FinishedMany { count },
    };

    tracing::info!(name, affected, "Finished sessions");
    Ok(outcome)
}

/// The single session present in `before` but not in `after`, if the two
/// active-set snapshots differ by exactly one element.
fn diff_finished<'a>(before: &'a [Session], after: &[Session]) -> Option<&'a Session> {
    let mut gone = before
        .iter()
        .filter(|b| !after.iter().any(|a| a.id == b.id));
    match (gone.next(), gone.next()) {
        (Some(session), None) => Some(session),
        _ => None,
    }
}
