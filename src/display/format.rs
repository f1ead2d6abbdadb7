//! Countdown text formatting

use std::time::Duration;

/// Format a remaining duration as `MM:SS`, or `HH:MM:SS` from one hour up.
/// Sub-second remainders are truncated.
pub fn format_remaining(remaining: Duration) -> String {
    format_whole_seconds(remaining.as_secs())
}

/// Same as [`format_remaining`] for a signed second count; negatives read `00:00`.
pub fn format_seconds(seconds: i64) -> String {
    format_whole_seconds(u64::try_from(seconds).unwrap_or(0))
}

fn format_whole_seconds(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
