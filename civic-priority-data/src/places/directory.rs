//! Wire types for the places directory "nearby search" endpoint.
//!
//! The directory answers with a `status` string alongside a list of results.
//! Only the fields the engine consumes are modelled; everything else is
//! ignored during deserialisation.

use civic_priority_core::{PlaceQueryError, RawPlace};
use geo::Point;
use log::debug;
use serde::Deserialize;

/// Nearby-search response body.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    /// Status code from the directory.
    ///
    /// Common values:
    /// - `"OK"` - results follow
    /// - `"ZERO_RESULTS"` - nothing matched
    /// - `"OVER_QUERY_LIMIT"` - quota exhausted
    /// - `"REQUEST_DENIED"` - credential rejected
    /// - `"INVALID_REQUEST"` - malformed parameters
    pub status: String,

    /// Matching places, possibly empty.
    #[serde(default)]
    pub results: Vec<PlaceResult>,

    /// Optional explanation accompanying a failure status.
    pub error_message: Option<String>,
}

/// One place in a nearby-search response.
#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    /// Stable directory identifier.
    pub place_id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Position wrapper.
    pub geometry: Option<Geometry>,
    /// Average user rating.
    pub rating: Option<f64>,
    /// Category tags.
    #[serde(default)]
    pub types: Vec<String>,
    /// Short address.
    pub vicinity: Option<String>,
    /// Opening-hours summary.
    pub opening_hours: Option<OpeningHours>,
    /// Operational state, e.g. `"OPERATIONAL"` or `"CLOSED_PERMANENTLY"`.
    pub business_status: Option<String>,
}

/// Geometry wrapper around a location.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// Latitude/longitude pair.
    pub location: LatLng,
}

/// Directory latitude/longitude pair.
#[derive(Debug, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Opening-hours summary.
#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    /// Whether the place is open at query time.
    pub open_now: Option<bool>,
}

impl NearbySearchResponse {
    /// Translate the directory status and results into engine records.
    ///
    /// Results without a usable position and permanently closed places are
    /// dropped.
    pub fn into_places(self) -> Result<Vec<RawPlace>, PlaceQueryError> {
        let message = self.error_message.unwrap_or_default();
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(self
                .results
                .into_iter()
                .filter_map(PlaceResult::into_raw_place)
                .collect()),
            "OVER_QUERY_LIMIT" => Err(PlaceQueryError::QuotaExceeded { message }),
            "REQUEST_DENIED" => Err(PlaceQueryError::AuthDenied { message }),
            other => Err(PlaceQueryError::transient(format!("{other}: {message}"))),
        }
    }
}

impl PlaceResult {
    fn into_raw_place(self) -> Option<RawPlace> {
        let name = self.name.unwrap_or_default();
        let Some(Geometry { location }) = self.geometry else {
            debug!("dropping place '{name}' without geometry");
            return None;
        };
        if !location.lat.is_finite() || !location.lng.is_finite() {
            debug!("dropping place '{name}' with a non-finite position");
            return None;
        }
        if self.business_status.as_deref() == Some("CLOSED_PERMANENTLY") {
            debug!("dropping permanently closed place '{name}'");
            return None;
        }
        Some(RawPlace {
            name,
            external_id: self.place_id.unwrap_or_default(),
            location: Point::new(location.lng, location.lat),
            rating: self.rating.filter(|rating| rating.is_finite() && *rating >= 0.0),
            types: self.types,
            vicinity: self.vicinity,
            open_now: self.opening_hours.and_then(|hours| hours.open_now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> NearbySearchResponse {
        serde_json::from_str(json).expect("should deserialise")
    }

    #[test]
    fn deserialise_success_response() {
        let response = parse(
            r#"{
                "status": "OK",
                "results": [{
                    "place_id": "abc",
                    "name": "Ram Manohar Lohia Hospital",
                    "geometry": {"location": {"lat": 28.6253, "lng": 77.2005}},
                    "rating": 3.9,
                    "types": ["hospital", "health", "point_of_interest"],
                    "vicinity": "Baba Kharak Singh Marg",
                    "opening_hours": {"open_now": true},
                    "html_attributions": []
                }]
            }"#,
        );

        let places = response.into_places().expect("should convert");

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].external_id, "abc");
        assert_eq!(places[0].location.y(), 28.6253);
        assert_eq!(places[0].location.x(), 77.2005);
        assert_eq!(places[0].open_now, Some(true));
        assert_eq!(places[0].rating, Some(3.9));
    }

    #[test]
    fn zero_results_is_empty_success() {
        let places = parse(r#"{"status": "ZERO_RESULTS", "results": []}"#)
            .into_places()
            .expect("should convert");
        assert!(places.is_empty());
    }

    #[test]
    fn drops_unusable_results() {
        let response = parse(
            r#"{
                "status": "OK",
                "results": [
                    {"place_id": "a", "name": "No Geometry"},
                    {"place_id": "b", "name": "Shut",
                     "geometry": {"location": {"lat": 1.0, "lng": 2.0}},
                     "business_status": "CLOSED_PERMANENTLY"},
                    {"place_id": "c", "name": "Open",
                     "geometry": {"location": {"lat": 1.0, "lng": 2.0}},
                     "business_status": "OPERATIONAL"}
                ]
            }"#,
        );

        let places = response.into_places().expect("should convert");

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Open");
    }

    #[test]
    fn maps_failure_statuses() {
        let quota = parse(r#"{"status": "OVER_QUERY_LIMIT", "error_message": "slow down"}"#);
        assert_eq!(
            quota.into_places(),
            Err(PlaceQueryError::QuotaExceeded {
                message: "slow down".to_string()
            })
        );

        let denied = parse(r#"{"status": "REQUEST_DENIED"}"#);
        assert!(matches!(
            denied.into_places(),
            Err(PlaceQueryError::AuthDenied { .. })
        ));

        let invalid = parse(r#"{"status": "INVALID_REQUEST", "error_message": "bad radius"}"#);
        match invalid.into_places() {
            Err(PlaceQueryError::TransientNetwork { message }) => {
                assert!(message.contains("INVALID_REQUEST"));
                assert!(message.contains("bad radius"));
            }
            other => panic!("expected TransientNetwork, got {other:?}"),
        }
    }
}
