//! Domain types for the transit bot.
//!
//! These are the validated values that flow between the lookup subsystems
//! and the classification pipeline. Types that carry invariants enforce them
//! at construction time.

mod arrival;
mod calendar;
mod outcome;
mod stop;

pub use arrival::{ArrivalResult, Departure, OUT_OF_SERVICE, RouteArrivals};
pub use calendar::{ExceptionType, InvalidServiceException, ServiceException};
pub use outcome::{FailureKind, LookupError, LookupOutcome, Timed, UPSTREAM_DOWN_MESSAGE, elapsed_ms};
pub use stop::{Coordinates, InvalidCoordinates, NearbyStop, StopRecord};
