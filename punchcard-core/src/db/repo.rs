//! Database repository layer
//!
//! Provides the narrow query surface the session lifecycle and period
//! aggregation code depend on: insert, bulk finish, active-set reads,
//! period-windowed selects, and the administrative reset.

use crate::error::Result;
use crate::types::{Period, Session};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rusqlite::{params, types::Type, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration as StdDuration;

/// Database handle with a single connection behind a mutex.
///
/// The tool is single-process and single-user; at most one statement is in
/// flight at a time. Statements wait on a locked database for the busy
/// timeout and then fail with a database error.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path, busy_timeout: StdDuration) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
        conn.busy_timeout(busy_timeout)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Insert a session and return the id the store assigned.
    ///
    /// The lifecycle manager always inserts with `finish = None`; an explicit
    /// finish is accepted so recorded history can be imported or seeded.
    pub fn insert_session(
        &self,
        name: &str,
        start: DateTime<Utc>,
        finish: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sessions (name, start, finish) VALUES (?1, ?2, ?3)",
            params![
                name,
                start.to_rfc3339(),
                finish.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Mark active sessions finished with one bulk UPDATE.
    ///
    /// `name = None` finishes every active session; `Some(name)` finishes
    /// only active sessions with that exact name. Returns the affected row
    /// count. The prior start times of the affected rows are not returned;
    /// callers that need them must read the active set around this call.
    pub fn finish_active(&self, name: Option<&str>, finish: DateTime<Utc>) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let affected = match name {
            None => conn.execute(
                "UPDATE sessions SET finish = ?1 WHERE finish IS NULL",
                params![finish.to_rfc3339()],
            )?,
            Some(name) => conn.execute(
                "UPDATE sessions SET finish = ?1 WHERE finish IS NULL AND name = ?2",
                params![finish.to_rfc3339(), name],
            )?,
        };
        Ok(affected)
    }

    /// All currently active sessions, oldest start first.
    pub fn active_sessions(&self) -> Result<Vec<Session>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, start, finish FROM sessions
             WHERE finish IS NULL ORDER BY start, id",
        )?;
        let sessions = stmt
            .query_map([], row_to_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Number of currently active sessions.
    pub fn num_active(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE finish IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Every stored session, oldest start first.
    pub fn all_sessions(&self) -> Result<Vec<Session>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, name, start, finish FROM sessions ORDER BY start, id")?;
        let sessions = stmt
            .query_map([], row_to_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Sessions matching a period's time predicate, evaluated against `now`.
    ///
    /// Periods that exclude active sessions filter them out here, so callers
    /// aggregating durations never see an unfinished row for those windows.
    pub fn sessions_in_period(&self, period: Period, now: DateTime<Utc>) -> Result<Vec<Session>> {
        let (since, until) = period_bounds(period, now);
        self.sessions_in_range(since, until, period.includes_active())
    }

    fn sessions_in_range(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        include_active: bool,
    ) -> Result<Vec<Session>> {
        let mut sql = String::from("SELECT id, name, start, finish FROM sessions WHERE 1=1");
        let mut args: Vec<String> = Vec::new();

        if !include_active {
            sql.push_str(" AND finish IS NOT NULL");
        }
        if let Some(since) = since {
            args.push(since.to_rfc3339());
            sql.push_str(&format!(" AND start >= ?{}", args.len()));
        }
        if let Some(until) = until {
            args.push(until.to_rfc3339());
            sql.push_str(&format!(" AND start < ?{}", args.len()));
        }
        sql.push_str(" ORDER BY start, id");

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let sessions = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), row_to_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Administrative reset: drop every stored session and start over.
    pub fn reset(&self) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute_batch(
                "DROP TABLE IF EXISTS sessions;
                 PRAGMA user_version = 0;",
            )?;
        }
        self.migrate()
    }
}

/// Time bounds `[since, until)` for a period, evaluated against `now`.
///
/// `today` spans the local calendar day; the rolling windows are measured
/// back from `now` itself.
fn period_bounds(
    period: Period,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match period {
        Period::All => (None, None),
        Period::Today => {
            let midnight = local_midnight(now);
            (Some(midnight), Some(midnight + Duration::days(1)))
        }
        Period::Last24h => (Some(now - Duration::hours(24)), None),
        Period::Week => (Some(now - Duration::days(7)), None),
        Period::Month => (Some(now - Duration::days(30)), None),
        Period::Year => (Some(now - Duration::days(365)), None),
    }
}

/// Local midnight of the calendar day containing `now`, as a UTC instant.
pub fn local_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let local_day = now.with_timezone(&Local).date_naive();
    let midnight = local_day
        .and_hms_opt(0, 0, 0)
        .expect("00:00:00 is a valid time");
    // On a DST gap day midnight may not exist locally; fall back to the
    // earliest valid instant of the day.
    match Local.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(t) | chrono::LocalResult::Ambiguous(t, _) => {
            t.with_timezone(&Utc)
        }
        chrono::LocalResult::None => now - Duration::hours(24),
    }
}

/// Map a `sessions` row to a [`Session`].
fn row_to_session(row: &Row) -> rusqlite::Result<Session> {
    let start_str: String = row.get("start")?;
    let finish_str: Option<String> = row.get("finish")?;

    let start = DateTime::parse_from_rfc3339(&start_str)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let finish = match finish_str {
        Some(s) => Some(
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                })?,
        ),
        None => None,
    };

    Ok(Session {
        id: row.get("id")?,
        name: row.get("name")?,
        start,
        finish,
    })
}
