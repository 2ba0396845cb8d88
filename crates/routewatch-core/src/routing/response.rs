//! Routing API response body (only the fields we persist).

use serde::Deserialize;
use thiserror::Error;

/// The response body does not have the shape `routes[0].summary.{...}`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contains no routes")]
    NoRoutes,
    #[error("invalid departureTime {value:?}: {source}")]
    DepartureTime {
        value: String,
        source: chrono::ParseError,
    },
    #[error("negative travelTimeInSeconds: {0}")]
    NegativeTravelTime(i64),
    #[error("invalid lengthInMeters: {0}")]
    InvalidLength(f64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingResponse {
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub summary: RouteSummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// ISO-8601 instant with offset, e.g. `2024-01-01T10:00:00+04:00`.
    pub departure_time: String,
    pub length_in_meters: f64,
    pub travel_time_in_seconds: i64,
}

impl RoutingResponse {
    /// Summary of the first (primary) route.
    pub fn first_summary(&self) -> Result<&RouteSummary, ParseError> {
        self.routes
            .first()
            .map(|r| &r.summary)
            .ok_or(ParseError::NoRoutes)
    }
}

/// Parse a 2xx body. Fails unless `routes[0].summary` is present.
pub fn parse_response(body: &str) -> Result<RoutingResponse, ParseError> {
    let response: RoutingResponse = serde_json::from_str(body)?;
    response.first_summary()?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_tomtom_summary() {
        let body = r#"{
            "formatVersion": "0.0.12",
            "routes": [{
                "summary": {
                    "lengthInMeters": 31842,
                    "travelTimeInSeconds": 1874,
                    "trafficDelayInSeconds": 120,
                    "departureTime": "2024-03-05T08:15:00+04:00",
                    "arrivalTime": "2024-03-05T08:46:14+04:00"
                },
                "legs": []
            }]
        }"#;
        let r = parse_response(body).unwrap();
        let s = r.first_summary().unwrap();
        assert_eq!(s.length_in_meters, 31842.0);
        assert_eq!(s.travel_time_in_seconds, 1874);
        assert_eq!(s.departure_time, "2024-03-05T08:15:00+04:00");
    }

    #[test]
    fn missing_summary_is_json_error() {
        let err = parse_response(r#"{"routes":[{"legs":[]}]}"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn empty_routes_is_no_routes() {
        let err = parse_response(r#"{"routes":[]}"#).unwrap_err();
        assert!(matches!(err, ParseError::NoRoutes));
    }

    #[test]
    fn error_body_is_json_error() {
        let err = parse_response(r#"{"error":{"description":"bad key"}}"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
