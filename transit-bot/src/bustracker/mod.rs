//! Bus tracker departures client.
//!
//! The tracker publishes one HTML page per stop listing each route serving
//! the stop and its next departures. This module fetches that page and turns
//! it into an [`ArrivalResult`](crate::domain::ArrivalResult).
//!
//! Key characteristics of the tracker:
//! - Stops are addressed by the tracker's own id, not the number on the sign
//! - There is no JSON API; the page markup is the contract
//! - Arrival data is real-time, so nothing here is cached

mod client;
mod error;
mod parse;

pub use client::{BustrackerClient, BustrackerConfig};
pub use error::BustrackerError;
pub use parse::{DeparturePage, FINISHED_TOKEN, ParseError, normalize_departure, parse_departure_page};
