use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Render how long ago `timestamp` was, relative to `now`, the way the notification
/// feed shows it: "Just now", "N min ago", "N hour(s) ago", "N day(s) ago".
///
/// Buckets use floor division. Timestamps in the future read as "Just now".
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_elapsed_seconds((now - timestamp).num_seconds())
}

pub fn format_elapsed_seconds(elapsed: i64) -> String {
    if elapsed < MINUTE {
        return "Just now".to_string();
    }
    if elapsed < HOUR {
        return format!("{} min ago", elapsed / MINUTE);
    }
    if elapsed < DAY {
        let hours = elapsed / HOUR;
        return format!("{} {} ago", hours, plural(hours, "hour"));
    }
    let days = elapsed / DAY;
    format!("{} {} ago", days, plural(days, "day"))
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 { unit.to_string() } else { format!("{unit}s") }
}
