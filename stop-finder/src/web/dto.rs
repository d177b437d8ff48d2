//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{RankedStop, Stop};
use crate::eta::RouteArrivals;

/// Query for a nearby stop search.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    /// Searcher latitude in degrees
    pub lat: f64,

    /// Searcher longitude in degrees
    pub lon: f64,

    /// Search radius in meters
    pub radius: f64,

    /// Optional client session id; a newer request with the same id
    /// supersedes an older one still in flight
    pub session: Option<String>,
}

/// Query for a single stop's details.
#[derive(Debug, Default, Deserialize)]
pub struct StopDetailRequest {
    pub session: Option<String>,
}

/// A stop in API responses.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: String,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_tc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_sc: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// A stop with its distance from the searcher.
#[derive(Debug, Serialize)]
pub struct NearbyStopResult {
    #[serde(flatten)]
    pub stop: StopResult,
    pub distance_meters: f64,
}

/// Response to a nearby stop search.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub stops: Vec<NearbyStopResult>,
}

/// Where to place a map marker for a stop.
#[derive(Debug, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// Upcoming arrivals for one route.
#[derive(Debug, Serialize)]
pub struct RouteArrivalsResult {
    pub route: String,

    /// "O" (outbound) or "I" (inbound)
    pub direction: String,

    pub destination_en: String,

    /// RFC 3339 timestamps, soonest first as published
    pub arrivals: Vec<String>,
}

/// Response for a single stop.
#[derive(Debug, Serialize)]
pub struct StopDetailResponse {
    pub stop: StopResult,
    pub marker: Marker,
    pub routes: Vec<RouteArrivalsResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StopResult {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id.to_string(),
            name_en: stop.name_en.clone(),
            name_tc: stop.name_tc.clone(),
            name_sc: stop.name_sc.clone(),
            lat: stop.lat,
            lon: stop.lon,
        }
    }
}

impl NearbyStopResult {
    pub fn from_ranked(ranked: &RankedStop) -> Self {
        Self {
            stop: StopResult::from_stop(&ranked.stop),
            distance_meters: ranked.distance_meters,
        }
    }
}

impl Marker {
    pub fn for_stop(stop: &Stop) -> Self {
        Self {
            lat: stop.lat,
            lon: stop.lon,
            label: stop.name_en.clone(),
        }
    }
}

impl RouteArrivalsResult {
    pub fn from_route(route: &RouteArrivals) -> Self {
        Self {
            route: route.route.clone(),
            direction: route.direction.as_code().to_string(),
            destination_en: route.destination_en.clone(),
            arrivals: route.arrivals.iter().map(|t| t.to_rfc3339()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;
    use crate::eta::Direction;
    use chrono::DateTime;

    fn stop() -> Stop {
        Stop::new(StopId::parse("S1").unwrap(), "MONG KOK", 22.30, 114.17)
    }

    #[test]
    fn nearby_result_flattens_stop() {
        let ranked = RankedStop {
            stop: stop(),
            distance_meters: 12.5,
        };

        let json = serde_json::to_value(NearbyStopResult::from_ranked(&ranked)).unwrap();

        assert_eq!(json["id"], "S1");
        assert_eq!(json["name_en"], "MONG KOK");
        assert_eq!(json["distance_meters"], 12.5);
        assert!(json.get("name_tc").is_none());
    }

    #[test]
    fn marker_uses_stop_coordinates() {
        let marker = Marker::for_stop(&stop());
        assert_eq!(marker.lat, 22.30);
        assert_eq!(marker.lon, 114.17);
        assert_eq!(marker.label, "MONG KOK");
    }

    #[test]
    fn route_arrivals_keep_offset() {
        let route = RouteArrivals {
            route: "1A".to_string(),
            direction: Direction::Outbound,
            destination_en: "STAR FERRY".to_string(),
            arrivals: vec![DateTime::parse_from_rfc3339("2024-03-15T10:05:00+08:00").unwrap()],
        };

        let result = RouteArrivalsResult::from_route(&route);

        assert_eq!(result.direction, "O");
        assert_eq!(result.arrivals, vec!["2024-03-15T10:05:00+08:00"]);
    }
}
