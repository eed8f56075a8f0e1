//! Address geocoding.
//!
//! Free-text rider input is sent to the Google geocoding API, biased to the
//! configured US state. Only street-level answers are accepted: a match on
//! a whole city is treated as no match at all.

mod client;
mod error;
mod types;

pub use client::{GeocodeClient, GeocodeConfig};
pub use error::GeocodeError;
pub use types::{ACCEPTED_PLACE_TYPES, GeocodeResponse, GeocodeResult};
