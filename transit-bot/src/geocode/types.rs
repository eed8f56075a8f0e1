//! Geocoding API response DTOs.
//!
//! These map directly to the JSON returned by the Google geocoding API. Only
//! the fields we use are declared.

use serde::{Deserialize, Serialize};

use crate::domain::Coordinates;

use super::error::GeocodeError;

/// Place types precise enough to search for stops around.
pub const ACCEPTED_PLACE_TYPES: [&str; 9] = [
    "route",
    "street_address",
    "intersection",
    "transit_station",
    "point_of_interest",
    "establishment",
    "train_station",
    "bus_station",
    "neighborhood",
];

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    /// "OK", "ZERO_RESULTS", or an error status such as "REQUEST_DENIED".
    pub status: String,

    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,

    /// Present on error statuses.
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A usable geocode for rider input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub coordinates: Coordinates,
}

impl GeocodeResponse {
    /// Interpret the response.
    ///
    /// Returns `Ok(None)` for no results, or when the best result is not one
    /// of [`ACCEPTED_PLACE_TYPES`]. Statuses other than `OK` and
    /// `ZERO_RESULTS` are errors.
    pub fn into_result(self) -> Result<Option<GeocodeResult>, GeocodeError> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(None),
            _ => {
                return Err(GeocodeError::Status {
                    status: self.status,
                    message: self.error_message,
                });
            }
        }

        let Some(best) = self.results.into_iter().next() else {
            return Ok(None);
        };

        if !best
            .types
            .iter()
            .any(|t| ACCEPTED_PLACE_TYPES.contains(&t.as_str()))
        {
            return Ok(None);
        }

        let location = best.geometry.location;
        let coordinates =
            Coordinates::new(location.lat, location.lng).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        Ok(Some(GeocodeResult {
            formatted_address: best.formatted_address,
            coordinates,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_street_level_match() {
        let r = response(
            r#"{"status":"OK","results":[{
                "formatted_address":"5th Ave & G St, Anchorage, AK 99501, USA",
                "geometry":{"location":{"lat":61.2176,"lng":-149.8953}},
                "types":["intersection"]}]}"#,
        );
        let result = r.into_result().unwrap().unwrap();
        assert_eq!(result.formatted_address, "5th Ave & G St, Anchorage, AK 99501, USA");
        assert_eq!(result.coordinates.lat(), 61.2176);
        assert_eq!(result.coordinates.lon(), -149.8953);
    }

    #[test]
    fn rejects_city_level_match() {
        let r = response(
            r#"{"status":"OK","results":[{
                "formatted_address":"Anchorage, AK, USA",
                "geometry":{"location":{"lat":61.2181,"lng":-149.9003}},
                "types":["locality","political"]}]}"#,
        );
        assert!(r.into_result().unwrap().is_none());
    }

    #[test]
    fn only_the_best_result_counts() {
        let r = response(
            r#"{"status":"OK","results":[
                {"formatted_address":"Alaska, USA","geometry":{"location":{"lat":64.2,"lng":-149.5}},"types":["administrative_area_level_1"]},
                {"formatted_address":"G St","geometry":{"location":{"lat":61.2,"lng":-149.9}},"types":["route"]}]}"#,
        );
        assert!(r.into_result().unwrap().is_none());
    }

    #[test]
    fn zero_results_is_not_an_error() {
        let r = response(r#"{"status":"ZERO_RESULTS","results":[]}"#);
        assert!(r.into_result().unwrap().is_none());
    }

    #[test]
    fn error_status_is_an_error() {
        let r = response(
            r#"{"status":"REQUEST_DENIED","results":[],"error_message":"bad key"}"#,
        );
        match r.into_result() {
            Err(GeocodeError::Status { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message.as_deref(), Some("bad key"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_results_field_defaults_to_empty() {
        let r = response(r#"{"status":"OK"}"#);
        assert!(r.into_result().unwrap().is_none());
    }
}
