//! Utility functions for time classification and string shaping.
//!
//! - Time classification for naming JSON snapshots
//! - Truncation and whitespace folding for log lines and the console preview

use chrono::{Local, NaiveTime};
use tracing::instrument;

/// Classify a time of day into morning, afternoon, or evening.
///
/// - **Morning**: 00:00 - 08:00
/// - **Afternoon**: 08:00 - 16:00
/// - **Evening**: 16:00 - 24:00
pub fn classify_time(tod: NaiveTime) -> &'static str {
    let morning_high = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    let afternoon_high = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

    if tod < morning_high {
        "morning"
    } else if tod < afternoon_high {
        "afternoon"
    } else {
        "evening"
    }
}

/// Classify the current local time. See [`classify_time`].
#[instrument]
pub fn time_of_day() -> String {
    let tod = Local::now().time();
    let which = classify_time(tod);
    tracing::debug!(%tod, %which, "Computed time_of_day");
    which.to_string()
}

/// Truncate a string to at most `max` characters, appending `…` when cut.
///
/// Counts characters rather than bytes, so multi-byte text never splits
/// inside a code point.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("short", 100), "short");
/// assert_eq!(truncate_chars("Zürich summit", 4), "Zür…");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}

/// Collapse every run of whitespace (including newlines) to one space.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
