//! Nearest-stop search.
//!
//! Finds stops inside a fixed-radius circle around a point and orders them
//! by great-circle distance. Combined with the geocoder this answers
//! "which stops are near this address?".

mod address;
mod config;
mod search;

pub use address::{AddressStops, Geocoder, NOT_FOUND_MESSAGE, resolve_stops_near_address};
pub use config::SearchConfig;
pub use search::{METERS_PER_MILE, find_nearest_stops, find_nearest_stops_str};

#[cfg(test)]
pub(crate) use address::testing;
