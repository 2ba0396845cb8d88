//! Types used by the measurement store.

use crate::config::RouteDefinition;
use crate::normalize::Measurement;

/// Row identifier (auto-assigned by SQLite).
pub type MeasurementId = i64;

/// A normalized measurement with its route coordinates attached, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub from_coords: String,
    pub to_coords: String,
    pub measurement: Measurement,
}

impl NewMeasurement {
    pub fn for_route(route: &RouteDefinition, measurement: Measurement) -> Self {
        Self {
            from_coords: route.from_coords.clone(),
            to_coords: route.to_coords.clone(),
            measurement,
        }
    }
}

/// Full row as read back by verification and analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMeasurement {
    pub id: MeasurementId,
    /// Departure instant, Unix seconds.
    pub timestamp: i64,
    pub date: String,
    pub day_of_week: String,
    pub from_coords: String,
    pub to_coords: String,
    pub distance_km: f64,
    pub travel_time_seconds: i64,
    pub travel_time_minutes: i64,
    /// Insertion instant, Unix seconds.
    pub created_at: i64,
}

impl StoredMeasurement {
    pub fn route_key(&self) -> (&str, &str) {
        (&self.from_coords, &self.to_coords)
    }

    /// The measurement part, for comparing against what was written.
    pub fn measurement(&self) -> Measurement {
        Measurement {
            timestamp: self.timestamp,
            date: self.date.clone(),
            day_of_week: self.day_of_week.clone(),
            distance_km: self.distance_km,
            travel_time_seconds: self.travel_time_seconds,
            travel_time_minutes: self.travel_time_minutes,
        }
    }
}
