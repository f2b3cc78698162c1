//! Period aggregation: summary statistics and chart-ready series for one
//! statistics window.
//!
//! All six dashboard pages run through the same pipeline: fetch the period's
//! sessions once, then derive totals, the per-name breakdown, and (for the
//! series-bearing periods) the daily minute buckets. Per-period differences
//! come from the [`Period`] descriptor, not from per-period code.

use crate::db::Database;
use crate::error::Result;
use crate::types::{Period, Session};
use chrono::{DateTime, Duration, Local, Utc};

/// Number of named entries kept in the breakdown before the overflow bucket.
const BREAKDOWN_NAMED: usize = 5;

/// Label of the overflow bucket that absorbs every name past the top five.
pub const OTHER_LABEL: &str = "Other";

/// One aggregated duration slice of the per-name breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct NameSlice {
    /// Session name, or [`OTHER_LABEL`] for the overflow bucket
    pub name: String,
    /// Total minutes of finished time attributed to this name
    pub minutes: f64,
}

/// Derived statistics for one period.
#[derive(Debug, Clone)]
pub struct PeriodStats {
    /// The window these statistics cover
    pub period: Period,
    /// Sessions matching the period's predicate, oldest first
    pub sessions: Vec<Session>,
    /// Finished sessions in the window
    pub completed: usize,
    /// Still-running sessions in the window
    pub active: usize,
    /// Sum of `finish - start` over finished sessions only
    pub total: Duration,
    /// Per-name duration breakdown, largest first, at most six entries
    pub breakdown: Vec<NameSlice>,
    /// Daily minute series (bucket 0 = oldest day, last = today), when the
    /// period charts one
    pub daily_minutes: Option<Vec<f64>>,
}

impl PeriodStats {
    /// Fetch and aggregate one period, evaluated against `now`.
    pub fn collect(db: &Database, period: Period, now: DateTime<Utc>) -> Result<Self> {
        let sessions = db.sessions_in_period(period, now)?;
        Ok(Self::from_sessions(period, sessions, now))
    }

    /// Aggregate an already-fetched session set.
    ///
    /// An empty set yields zero counts, zero duration, an empty breakdown,
    /// and an all-zero series.
    pub fn from_sessions(period: Period, sessions: Vec<Session>, now: DateTime<Utc>) -> Self {
        let active = sessions.iter().filter(|s| s.is_active()).count();
        let completed = sessions.len() - active;
        let total = sessions
            .iter()
            .filter_map(Session::duration)
            .fold(Duration::zero(), |acc, d| acc + d);
        let breakdown = name_breakdown(&sessions);
        let daily_minutes = period
            .series_len()
            .map(|len| daily_series(&sessions, len, now));

        Self {
            period,
            sessions,
            completed,
            active,
            total,
            breakdown,
            daily_minutes,
        }
    }
}

/// Minutes of finished time per distinct name, largest first.
///
/// Names are accumulated in first-encountered order, and the descending
/// sort is stable, so equal totals keep that order. When more than six
/// distinct names exist, the first five survive and the rest collapse into
/// a single trailing [`OTHER_LABEL`] slice; with six or fewer, every name
/// keeps its own slice.
pub fn name_breakdown(sessions: &[Session]) -> Vec<NameSlice> {
    let mut slices: Vec<NameSlice> = Vec::new();
    for session in sessions {
        let Some(duration) = session.duration() else {
            continue;
        };
        let minutes = duration.num_seconds() as f64 / 60.0;
        match slices.iter_mut().find(|s| s.name == session.name) {
            Some(slice) => slice.minutes += minutes,
            None => slices.push(NameSlice {
                name: session.name.clone(),
                minutes,
            }),
        }
    }

    slices.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));

    if slices.len() > BREAKDOWN_NAMED + 1 {
        let other_minutes: f64 = slices[BREAKDOWN_NAMED..].iter().map(|s| s.minutes).sum();
        slices.truncate(BREAKDOWN_NAMED);
        slices.push(NameSlice {
            name: OTHER_LABEL.to_string(),
            minutes: other_minutes,
        });
    }

    slices
}

/// Bucket finished session durations (in minutes) by local calendar day.
///
/// Bucket `len - 1` is today, bucket 0 the oldest day of the window. A
/// session whose start day falls outside the window is skipped rather than
/// written out of bounds; the fetch window and the calendar-day bucketing
/// disagree at the edges, so this clamp is load-bearing.
pub fn daily_series(sessions: &[Session], len: usize, now: DateTime<Utc>) -> Vec<f64> {
    let mut data = vec![0.0; len];
    let today = now.with_timezone(&Local).date_naive();

    for session in sessions {
        let Some(duration) = session.duration() else {
            continue;
        };
        let day = session.start.with_timezone(&Local).date_naive();
        let days_ago = (today - day).num_days();
        if days_ago < 0 || days_ago >= len as i64 {
            continue;
        }
        data[len - 1 - days_ago as usize] += duration.num_seconds() as f64 / 60.0;
    }

    data
}
