use chrono::{SecondsFormat, Utc};

/// The current wall-clock time as RFC 3339 in UTC, e.g. `2024-01-01T12:00:00Z`
pub fn now_formatted() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
