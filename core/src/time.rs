//! Time related utils.

use chrono::Utc;

/// DateTime in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a DateTime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Milliseconds since the Unix epoch, as carried by the `rtick` parameter.
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}
