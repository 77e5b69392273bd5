//! Human-readable durations and dates.

use chrono::DateTime;

/// Placeholder shown for values that cannot be computed.
pub const PLACEHOLDER: &str = "-";

/// Format a number of seconds with its two most significant units.
///
/// `"2d 4h"`, `"3h 12m"`, `"45m"`, `"30s"`. Negative inputs clamp to zero.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}

/// Format a unix timestamp as a UTC calendar date (`YYYY-MM-DD`).
pub fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map_or_else(|| PLACEHOLDER.to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}
