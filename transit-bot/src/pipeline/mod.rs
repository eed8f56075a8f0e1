//! Rider request handling.
//!
//! Raw channel text goes through a fixed chain:
//!
//! 1. [`sanitize`] the text
//! 2. holiday gate: a no-service day answers every request
//! 3. [`classify`] as blank, greeting, stop number or address
//! 4. stop numbers go to the [`ArrivalSource`], addresses to the
//!    [`Geocoder`]; addresses that resolve to nothing go to the [`Fallback`]
//!
//! The chain is linear. A stage that claims the input answers it, and no
//! later stage sees it. Every answered request is recorded once on the
//! [`EventSink`].

mod classify;
mod fallback;
mod sanitize;

pub use classify::{GREETINGS, Request, classify};
pub use fallback::{CannedFallback, DEFAULT_HELP_MESSAGE, Fallback};
pub use sanitize::sanitize;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::domain::{ArrivalResult, FailureKind, LookupError, LookupOutcome, Timed, elapsed_ms};
use crate::events::{Action, ActionRecord, BotEvent, EventSink, Subject, Timings};
use crate::gtfs::{RouteNumbers, TransitSnapshot};
use crate::nearby::{AddressStops, Geocoder, SearchConfig, resolve_stops_near_address};

/// Shown for stop numbers that are not in the stop table.
pub const STOP_NOT_FOUND_MESSAGE: &str = "Stop number not found";

/// Trait for fetching live arrivals.
///
/// This abstraction lets the pipeline be tested without the real tracker.
/// Implementations turn every failure into a [`LookupError`].
pub trait ArrivalSource: Send + Sync {
    /// Arrivals at the tracker stop `provider_stop_id`. Route names are
    /// numbered with `routes`.
    fn fetch_arrivals(
        &self,
        provider_stop_id: u32,
        routes: &RouteNumbers,
    ) -> impl Future<Output = LookupOutcome<ArrivalResult>> + Send;
}

/// The answer to one request, before rendering for a channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Reply {
    /// Today is a no-service day. `date` is `YYYYMMDD`.
    NoService { date: String },
    EmptyInput,
    About,
    Arrivals(Timed<ArrivalResult>),
    NearbyStops(Timed<AddressStops>),
    Failure { kind: FailureKind, message: String },
    /// Free text from the fallback.
    Fallback(String),
}

impl Reply {
    fn failure(error: &LookupError) -> Self {
        Reply::Failure {
            kind: error.kind(),
            message: error.rider_message().to_string(),
        }
    }
}

/// A reply and how it was classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Handled {
    pub action: Action,
    pub reply: Reply,
}

/// The request pipeline, generic over its three collaborators.
pub struct Pipeline<A, G, F> {
    arrivals: A,
    geocoder: G,
    fallback: F,
    search: SearchConfig,
    sink: Arc<dyn EventSink>,
}

impl<A, G, F> Pipeline<A, G, F>
where
    A: ArrivalSource,
    G: Geocoder,
    F: Fallback,
{
    pub fn new(
        arrivals: A,
        geocoder: G,
        fallback: F,
        search: SearchConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            arrivals,
            geocoder,
            fallback,
            search,
            sink,
        }
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Answer raw rider input against one snapshot of the transit tables.
    ///
    /// `today` is the current date in the transit agency's time zone.
    pub async fn handle(&self, raw: &str, snapshot: &TransitSnapshot, today: NaiveDate) -> Handled {
        let start = Instant::now();
        let text = sanitize(raw);

        let (handled, subject, upstream_ms) = self.dispatch(text, snapshot, today).await;

        self.sink.record(BotEvent::Action(ActionRecord {
            action: handled.action,
            subject,
            timings: Timings {
                total_ms: elapsed_ms(start),
                upstream_ms,
            },
        }));
        handled
    }

    async fn dispatch(
        &self,
        text: String,
        snapshot: &TransitSnapshot,
        today: NaiveDate,
    ) -> (Handled, Subject, Option<u64>) {
        if let Some(exception) = snapshot.service_exception_on(today) {
            let reply = Reply::NoService {
                date: exception.date_string(),
            };
            return (
                Handled {
                    action: Action::ServiceException,
                    reply,
                },
                Subject::RawInput(text),
                None,
            );
        }

        match classify(&text) {
            Request::Blank => (
                Handled {
                    action: Action::EmptyInput,
                    reply: Reply::EmptyInput,
                },
                Subject::RawInput(text),
                None,
            ),
            Request::About => (
                Handled {
                    action: Action::About,
                    reply: Reply::About,
                },
                Subject::RawInput(text),
                None,
            ),
            Request::StopNumber(digits) => self.stop_request(&digits, text, snapshot).await,
            Request::Address(address) => self.address_request(address, snapshot).await,
        }
    }

    async fn stop_request(
        &self,
        digits: &str,
        text: String,
        snapshot: &TransitSnapshot,
    ) -> (Handled, Subject, Option<u64>) {
        let Ok(number) = digits.parse::<u32>() else {
            debug!(digits, "stop number out of range");
            let error = LookupError::NotFound(STOP_NOT_FOUND_MESSAGE.to_string());
            return (
                Handled {
                    action: Action::FailedStopLookup,
                    reply: Reply::failure(&error),
                },
                Subject::RawInput(text),
                None,
            );
        };

        match self.arrivals_for_stop(number, snapshot).await {
            Ok(timed) => {
                let upstream_ms = Some(timed.timing_ms);
                (
                    Handled {
                        action: Action::StopLookup,
                        reply: Reply::Arrivals(timed),
                    },
                    Subject::StopId(number),
                    upstream_ms,
                )
            }
            Err(error) => (
                Handled {
                    action: Action::FailedStopLookup,
                    reply: Reply::failure(&error),
                },
                Subject::StopId(number),
                None,
            ),
        }
    }

    async fn address_request(
        &self,
        address: String,
        snapshot: &TransitSnapshot,
    ) -> (Handled, Subject, Option<u64>) {
        let outcome = resolve_stops_near_address(
            &self.geocoder,
            snapshot,
            &self.search,
            self.sink.as_ref(),
            &address,
        )
        .await;

        match outcome {
            Ok(timed) => {
                let subject = Subject::GeocodedAddress(timed.data.geocode.formatted_address.clone());
                let upstream_ms = Some(timed.timing_ms);
                (
                    Handled {
                        action: Action::AddressLookup,
                        reply: Reply::NearbyStops(timed),
                    },
                    subject,
                    upstream_ms,
                )
            }
            Err(LookupError::NotFound(_)) => {
                let answer = self.fallback.respond(&address).await;
                (
                    Handled {
                        action: Action::FailedAddressLookup,
                        reply: Reply::Fallback(answer),
                    },
                    Subject::RawInput(address),
                    None,
                )
            }
            Err(error) => (
                Handled {
                    action: Action::FailedAddressLookup,
                    reply: Reply::failure(&error),
                },
                Subject::RawInput(address),
                None,
            ),
        }
    }

    /// Live arrivals for a rider-facing stop number.
    ///
    /// Unknown numbers are [`LookupError::NotFound`] without contacting the
    /// tracker. The result carries the rider's stop number, not the
    /// tracker's id.
    pub async fn arrivals_for_stop(
        &self,
        rider_stop_number: u32,
        snapshot: &TransitSnapshot,
    ) -> LookupOutcome<ArrivalResult> {
        let Some(provider_stop_id) = snapshot.provider_stop_id(rider_stop_number) else {
            debug!(rider_stop_number, "unknown stop number");
            return Err(LookupError::NotFound(STOP_NOT_FOUND_MESSAGE.to_string()));
        };

        let mut timed = self
            .arrivals
            .fetch_arrivals(provider_stop_id, snapshot.routes())
            .await?;
        timed.data.stop_number = rider_stop_number;
        Ok(timed)
    }
}
