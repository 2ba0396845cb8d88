//! Routing response → canonical measurement.
//!
//! The departure instant reported by the API is kept as Unix seconds; the
//! calendar date and weekday are derived from the same instant viewed in the
//! fixed civil timezone (`Asia/Dubai`, UTC+4, no DST).

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use crate::routing::{ParseError, RouteSummary, RoutingResponse};

/// Civil timezone anchor for `date` / `day_of_week`.
pub const CIVIL_TZ: Tz = chrono_tz::Asia::Dubai;

/// One observation, before origin/destination are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Departure instant as Unix seconds.
    pub timestamp: i64,
    /// `YYYY-MM-DD` of `timestamp` in the civil timezone.
    pub date: String,
    /// English weekday name of `timestamp` in the civil timezone.
    pub day_of_week: String,
    pub distance_km: f64,
    pub travel_time_seconds: i64,
    /// `travel_time_seconds / 60`, rounded half up.
    pub travel_time_minutes: i64,
}

/// Normalize the first route of a response.
pub fn normalize(response: &RoutingResponse) -> Result<Measurement, ParseError> {
    normalize_summary(response.first_summary()?)
}

pub fn normalize_summary(summary: &RouteSummary) -> Result<Measurement, ParseError> {
    let departure = DateTime::parse_from_rfc3339(summary.departure_time.trim()).map_err(|e| {
        ParseError::DepartureTime {
            value: summary.departure_time.clone(),
            source: e,
        }
    })?;
    if summary.travel_time_in_seconds < 0 {
        return Err(ParseError::NegativeTravelTime(summary.travel_time_in_seconds));
    }
    if !summary.length_in_meters.is_finite() || summary.length_in_meters < 0.0 {
        return Err(ParseError::InvalidLength(summary.length_in_meters));
    }

    let local = departure.with_timezone(&CIVIL_TZ);
    let (date, day_of_week) = civil_labels(&local);

    Ok(Measurement {
        timestamp: departure.timestamp(),
        date,
        day_of_week,
        distance_km: summary.length_in_meters / 1000.0,
        travel_time_seconds: summary.travel_time_in_seconds,
        travel_time_minutes: round_minutes(summary.travel_time_in_seconds),
    })
}

/// Whole minutes for a non-negative duration in seconds, halves rounded up (1830 → 31).
pub fn round_minutes(seconds: i64) -> i64 {
    (seconds + 30).div_euclid(60)
}

/// The instant `timestamp` (Unix seconds) in the civil timezone.
pub fn to_civil(timestamp: i64) -> Option<DateTime<Tz>> {
    CIVIL_TZ.timestamp_opt(timestamp, 0).single()
}

/// `(date, day_of_week)` for `timestamp` in the civil timezone.
pub fn civil_date_and_weekday(timestamp: i64) -> Option<(String, String)> {
    to_civil(timestamp).map(|dt| civil_labels(&dt))
}

fn civil_labels(dt: &DateTime<Tz>) -> (String, String) {
    (
        dt.format("%Y-%m-%d").to_string(),
        dt.format("%A").to_string(),
    )
}
