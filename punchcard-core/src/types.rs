//! Domain types for punchcard.
//!
//! A [`Session`] is one recorded span of work. Sessions can overlap freely:
//! several may be active at once, with the same or different names.
//! [`Period`] describes one statistics window and doubles as the page
//! descriptor for the dashboard, so every period-specific difference lives
//! here as data rather than as a separate page implementation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One recorded work session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Row id assigned by the store on insert
    pub id: i64,
    /// Optional label; empty string means unnamed
    pub name: String,
    /// When the session was started (UTC)
    pub start: DateTime<Utc>,
    /// When the session was finished; `None` while it is still running
    pub finish: Option<DateTime<Utc>>,
}

impl Session {
    /// A session is active while its finish time is unset.
    pub fn is_active(&self) -> bool {
        self.finish.is_none()
    }

    /// Duration of a finished session; `None` while it is still running,
    /// since an unfinished session has no well-defined duration.
    pub fn duration(&self) -> Option<Duration> {
        self.finish.map(|finish| finish - self.start)
    }

    /// Name for display purposes; unnamed sessions show as "none".
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "none"
        } else {
            &self.name
        }
    }
}

/// A named statistics window.
///
/// Each variant carries the per-period differences the dashboard needs:
/// whether active sessions are part of the fetch, whether the page shows a
/// scrollable session list, and the length of the daily series chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Everything ever recorded
    All,
    /// The current calendar day, local midnight to midnight
    Today,
    /// Rolling 24-hour window
    Last24h,
    /// Rolling 7-day window
    Week,
    /// Rolling 30-day window
    Month,
    /// Rolling 365-day window
    Year,
}

impl Period {
    /// All periods, in dashboard tab order.
    pub const ALL: [Period; 6] = [
        Period::All,
        Period::Today,
        Period::Last24h,
        Period::Week,
        Period::Month,
        Period::Year,
    ];

    /// Tab title shown in the dashboard header.
    pub fn title(&self) -> &'static str {
        match self {
            Period::All => "All",
            Period::Today => "Today",
            Period::Last24h => "24hrs",
            Period::Week => "Week",
            Period::Month => "Month",
            Period::Year => "Year",
        }
    }

    /// Phrase used in CLI summaries ("Total duration in the last week").
    pub fn describe(&self) -> &'static str {
        match self {
            Period::All => "overall",
            Period::Today => "today",
            Period::Last24h => "in the last 24 hours",
            Period::Week => "in the last week",
            Period::Month => "in the last month",
            Period::Year => "in the last year",
        }
    }

    /// Whether still-running sessions are part of this period's fetch.
    /// They count toward the active tally but never toward durations.
    pub fn includes_active(&self) -> bool {
        matches!(self, Period::All | Period::Today)
    }

    /// Whether this period's dashboard page carries a scrollable session list.
    pub fn has_list(&self) -> bool {
        matches!(self, Period::Today | Period::Last24h)
    }

    /// Number of daily buckets for this period's series chart, if any.
    pub fn series_len(&self) -> Option<usize> {
        match self {
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::Year => Some(365),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error returned when a CLI period selector is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPeriod(pub String);

impl fmt::Display for InvalidPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid period selector: '{}'", self.0)
    }
}

impl std::error::Error for InvalidPeriod {}

impl FromStr for Period {
    type Err = InvalidPeriod;

    /// Parse a CLI selector. The empty string selects [`Period::All`] and
    /// `day` is the historical spelling of the rolling 24-hour window.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Period::All),
            "today" => Ok(Period::Today),
            "day" | "24h" => Ok(Period::Last24h),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(InvalidPeriod(other.to_string())),
        }
    }
}
