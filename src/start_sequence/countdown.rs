use crate::http_handler::Scheduled;
use chrono::{DateTime, TimeDelta, Utc};

/// Formats a time span as `hh:mm:ss`, prefixed with `-` when negative.
/// Sub-second parts are truncated towards zero.
pub fn format_signed_hms(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() && delta.num_seconds() != 0 { "-" } else { "" };
    let secs = delta.num_seconds().abs();
    format!("{sign}{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Race time relative to the planned start: negative while counting down,
/// positive once under way. `None` for races without a planned start.
pub fn race_countdown<S: Scheduled>(race: &S, now: DateTime<Utc>) -> Option<TimeDelta> {
    race.planned_start().map(|start| now - start)
}
