use chrono::{DateTime, Datelike, Local};

/// Format a transcript timestamp relative to `now`:
/// - Same day: "14:05"
/// - Earlier this year: "Jan 15 14:05"
/// - Older: "Dec 3, 2024 14:05"
pub fn format_message_time(timestamp: &DateTime<Local>, now: &DateTime<Local>) -> String {
    if timestamp.date_naive() == now.date_naive() {
        timestamp.format("%H:%M").to_string()
    } else if timestamp.year() == now.year() {
        timestamp.format("%b %-d %H:%M").to_string()
    } else {
        timestamp.format("%b %-d, %Y %H:%M").to_string()
    }
}
