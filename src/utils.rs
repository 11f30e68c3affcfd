use chrono::{DateTime, Utc};

/// Compact `1h 2m 3s` style rendering; negative input renders as `0s`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if mins > 0 {
        parts.push(format!("{}m", mins));
    }
    if secs > 0 || (hours == 0 && mins == 0) {
        parts.push(format!("{}s", secs));
    }

    parts.join(" ")
}

/// How long ago `then` was, at minute resolution, for the history list.
pub fn format_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mins = (now - then).num_minutes();
    match mins {
        i64::MIN..=0 => "just now".to_string(),
        1 => "1 minute ago".to_string(),
        2..=59 => format!("{} minutes ago", mins),
        60..=119 => "about 1 hour ago".to_string(),
        _ => format!("about {} hours ago", mins / 60),
    }
}
