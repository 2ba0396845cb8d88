//! Boundary arithmetic on wall-clock minutes.

use chrono::{DateTime, TimeZone, Timelike};

/// Latest boundary at or before `now` (seconds and sub-seconds dropped).
pub fn floor_boundary<Tz: TimeZone>(now: &DateTime<Tz>, interval_minutes: u32) -> DateTime<Tz> {
    let interval = interval_minutes.max(1);
    let past = i64::from(now.minute() % interval) * 60 + i64::from(now.second());
    now.clone()
        - chrono::Duration::seconds(past)
        - chrono::Duration::nanoseconds(i64::from(now.nanosecond()))
}

/// First boundary strictly after `now`.
pub fn next_boundary<Tz: TimeZone>(now: &DateTime<Tz>, interval_minutes: u32) -> DateTime<Tz> {
    floor_boundary(now, interval_minutes)
        + chrono::Duration::minutes(i64::from(interval_minutes.max(1)))
}

/// Time left until `target`, zero if it has passed.
pub fn time_until<Tz: TimeZone>(now: &DateTime<Tz>, target: &DateTime<Tz>) -> std::time::Duration {
    (target.clone() - now.clone()).to_std().unwrap_or_default()
}
