//! Address → nearby stops.

use std::future::Future;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::domain::{LookupError, LookupOutcome, NearbyStop, Timed, elapsed_ms};
use crate::events::{BotEvent, EventSink};
use crate::geocode::{GeocodeError, GeocodeResult};
use crate::gtfs::TransitSnapshot;

use super::config::SearchConfig;
use super::search::nearest_to;

/// Shown when an address cannot be resolved, whatever the reason.
pub const NOT_FOUND_MESSAGE: &str = "Sorry, I couldn't find that address";

/// Trait for turning free text into a location.
///
/// This abstraction allows the address lookup to be tested without the
/// real geocoding API.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means nothing usable was found; `Err` means the geocoder
    /// itself failed.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<GeocodeResult>, GeocodeError>> + Send;
}

/// A geocoded address and the stops around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressStops {
    pub geocode: GeocodeResult,
    /// Nearest first. May be empty if the address is outside the network.
    pub stops: Vec<NearbyStop>,
}

/// Geocode `text` and find stops around the result.
///
/// A geocoder failure is reported to `sink` and then treated exactly like an
/// address that was not found, so riders see one message for both.
pub async fn resolve_stops_near_address<G: Geocoder>(
    geocoder: &G,
    snapshot: &TransitSnapshot,
    config: &SearchConfig,
    sink: &dyn EventSink,
    text: &str,
) -> LookupOutcome<AddressStops> {
    let start = Instant::now();

    let geocode = match geocoder.geocode(text).await {
        Ok(Some(geocode)) => geocode,
        Ok(None) => {
            debug!(input = text, "no usable geocode");
            return Err(LookupError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        Err(e) => {
            sink.record(BotEvent::GeocoderFailure {
                input: text.to_string(),
                detail: e.to_string(),
            });
            return Err(LookupError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
    };
    let timing_ms = elapsed_ms(start);

    let stops = nearest_to(snapshot.stops(), geocode.coordinates, config);
    Ok(Timed::new(AddressStops { geocode, stops }, timing_ms))
}
