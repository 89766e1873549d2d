// Date utility functions
// Clock formatting for minute offsets and trip date labels.

use chrono::NaiveDate;

use crate::models::time_range::TimeRange;

/// Format minutes since midnight as `HH:MM`. 1440 renders as `24:00`.
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Format a range as `HH:MM–HH:MM`.
pub fn format_range(range: &TimeRange) -> String {
    format!(
        "{}–{}",
        format_clock(range.start_minutes),
        format_clock(range.end_minutes())
    )
}

/// Format a duration as `1h40m`, `45m` or `2h`.
pub fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{:02}m", h, m),
    }
}

/// Header label of a day track, e.g. `Day 2 · Fri 02 May`.
pub fn day_label(day_index: usize, date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("Day {} · {}", day_index + 1, date.format("%a %d %b")),
        None => format!("Day {}", day_index + 1),
    }
}
