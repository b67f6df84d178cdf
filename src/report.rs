//! Console rendering of events and sessions.

use crate::classifier::StructuredEvent;
use crate::intervals::{ConnectionInterval, SessionReport};
use chrono::{Duration, NaiveDateTime};

const DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_datetime(at: NaiveDateTime) -> String {
    at.format(DATETIME).to_string()
}

/// Formats a duration as `H:MM:SS`, prefixed with `N day(s), ` when it spans
/// at least a day. Negative durations get a leading `-`.
///
/// ```
/// use chrono::Duration;
/// use wlan_guest_log::report::format_duration;
///
/// assert_eq!(format_duration(Duration::seconds(3725)), "1:02:05");
/// assert_eq!(format_duration(Duration::hours(25)), "1 day, 1:00:00");
/// assert_eq!(format_duration(Duration::days(3)), "3 days, 0:00:00");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{sign}{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("{sign}1 day, {hours}:{minutes:02}:{seconds:02}"),
        n => format!("{sign}{n} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}

/// One event dump line: timestamp followed by the event's fields.
#[must_use]
pub fn event_line(event: &StructuredEvent) -> String {
    format!("{} {event}", format_datetime(event.timestamp))
}

/// One session line: `start → end (duration)`.
///
/// An unknown start renders as `?`, and so does its duration.
#[must_use]
pub fn interval_line(interval: &ConnectionInterval) -> String {
    let start = interval
        .start
        .map_or_else(|| "?".to_string(), format_datetime);
    let duration = interval
        .duration()
        .map_or_else(|| "?".to_string(), format_duration);
    format!("{start} → {} ({duration})", format_datetime(interval.end))
}

/// Renders the full session report.
///
/// Each device contributes a blank line, its MAC address, and one line per
/// interval.
#[must_use]
pub fn render_sessions(report: &SessionReport) -> String {
    let mut out = String::new();
    for (mac, intervals) in report {
        out.push('\n');
        out.push_str(mac);
        out.push('\n');
        for interval in intervals {
            out.push_str(&interval_line(interval));
            out.push('\n');
        }
    }
    out
}
