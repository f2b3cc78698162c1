//! Formatting helpers shared across the CLI and the dashboard.

use chrono::Duration;

const UNITS: [(&str, i64); 4] = [
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Format a duration as its `limit` most significant non-zero units
/// (e.g., 2 days 3 hours 10 minutes with a limit of 2 renders "2 days 3 hours").
///
/// Zero and negative durations render as "0 seconds".
pub fn format_duration(duration: Duration, limit: usize) -> String {
    let mut remaining = duration.num_seconds();
    if remaining <= 0 || limit == 0 {
        return "0 seconds".to_string();
    }

    // Zero-valued units are skipped entirely, so the limit counts only the
    // units that actually appear.
    let mut parts = Vec::with_capacity(limit);
    for (unit, secs) in UNITS {
        if parts.len() == limit {
            break;
        }
        let count = remaining / secs;
        if count > 0 {
            remaining -= count * secs;
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", count, unit, plural));
        }
    }

    parts.join(" ")
}
