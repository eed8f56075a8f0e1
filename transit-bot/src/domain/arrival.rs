//! Arrival board types produced by the bus tracker scraper.

use std::fmt;

use serde::{Serialize, Serializer};

/// Shown in place of a time once a route has finished for the day.
pub const OUT_OF_SERVICE: &str = "Out of Service";

/// One entry in a route's departure list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// A display time such as "3:15 PM".
    Time(String),
    /// The route is finished for the day.
    OutOfService,
}

impl Departure {
    pub fn as_str(&self) -> &str {
        match self {
            Departure::Time(t) => t,
            Departure::OutOfService => OUT_OF_SERVICE,
        }
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Departure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Departures for a single route at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteArrivals {
    pub route_name: String,
    /// Public route number, when the route name is in the GTFS route table.
    pub route_number: Option<u32>,
    /// In the order the tracker listed them.
    pub times: Vec<Departure>,
}

impl RouteArrivals {
    pub fn new(route_name: impl Into<String>, route_number: Option<u32>) -> Self {
        Self {
            route_name: route_name.into(),
            route_number,
            times: Vec::new(),
        }
    }
}

/// A parsed arrival board for one stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalResult {
    pub stop_name: String,
    pub stop_number: u32,
    /// Routes in page order.
    pub routes: Vec<RouteArrivals>,
    /// Wall-clock time spent waiting on the tracker, excluding parsing.
    pub fetch_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_service_displays_sentinel() {
        assert_eq!(Departure::OutOfService.to_string(), "Out of Service");
        assert_eq!(Departure::Time("3:15 PM".into()).to_string(), "3:15 PM");
    }

    #[test]
    fn departures_serialize_as_plain_strings() {
        let route = RouteArrivals {
            route_name: "Muldoon".into(),
            route_number: Some(3),
            times: vec![Departure::Time("3:15 PM".into()), Departure::OutOfService],
        };
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["times"][0], "3:15 PM");
        assert_eq!(json["times"][1], "Out of Service");
        assert_eq!(json["route_number"], 3);
    }
}
