//! Transit data source backed by a GTFS feed on disk.
//!
//! Provides the stop table (rider stop number → tracker stop id and
//! location), the route name → route number table and the service exception
//! calendar. Readers take an immutable [`TransitSnapshot`]; reloads build a new
//! snapshot and swap it in whole.

mod error;
mod load;
mod snapshot;
mod store;

pub use error::GtfsError;
pub use load::load_snapshot;
pub use snapshot::{RouteNumbers, TransitSnapshot};
pub use store::{GtfsConfig, TransitData};
