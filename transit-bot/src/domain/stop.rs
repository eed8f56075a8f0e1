//! Stop records and coordinates.

use std::fmt;

use serde::Serialize;

/// Error returned when latitude/longitude values are unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinates: {reason}")]
pub struct InvalidCoordinates {
    reason: &'static str,
}

/// A WGS84 position.
///
/// Latitude is always within `[-90, 90]` and longitude within `[-180, 180]`.
/// Both are finite.
///
/// # Examples
///
/// ```
/// use transit_bot::domain::Coordinates;
///
/// let c = Coordinates::parse("61.2176", "-149.8953").unwrap();
/// assert_eq!(c.to_string(), "61.2176,-149.8953");
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// assert!(Coordinates::parse("north", "-149.8953").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting NaN, infinities and out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinates> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinates {
                reason: "must be finite numbers",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinates {
                reason: "latitude must be between -90 and 90",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinates {
                reason: "longitude must be between -180 and 180",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Parse coordinates from numeric strings (surrounding whitespace allowed).
    pub fn parse(lat: &str, lon: &str) -> Result<Self, InvalidCoordinates> {
        let lat = lat.trim().parse::<f64>().map_err(|_| InvalidCoordinates {
            reason: "latitude is not a number",
        })?;
        let lon = lon.trim().parse::<f64>().map_err(|_| InvalidCoordinates {
            reason: "longitude is not a number",
        })?;
        Self::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Convert to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// A stop from the transit data snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRecord {
    /// Number printed on the stop sign.
    pub rider_stop_number: u32,
    /// Identifier used by the arrival tracker.
    pub provider_stop_id: u32,
    pub coordinates: Coordinates,
    /// Display label for the stop (e.g. "5TH AVENUE & G STREET").
    pub name: String,
}

/// A stop near a searched location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyStop {
    pub name: String,
    pub rider_stop_number: String,
    pub distance_miles: f64,
    /// `"lat,lon"`, ready for a map link.
    pub coordinates: String,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every in-range pair is accepted and round-trips through Display/parse.
        #[test]
        fn in_range_roundtrip(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let c = Coordinates::new(lat, lon).unwrap();
            let text = c.to_string();
            let (lat_s, lon_s) = text.split_once(',').unwrap();
            let parsed = Coordinates::parse(lat_s, lon_s).unwrap();
            prop_assert_eq!(parsed, c);
        }

        /// Latitudes beyond the poles are always rejected.
        #[test]
        fn polar_overflow_rejected(lat in 90.0001f64..1e6, lon in -180.0f64..=180.0) {
            prop_assert!(Coordinates::new(lat, lon).is_err());
            prop_assert!(Coordinates::new(-lat, lon).is_err());
        }
    }
}
