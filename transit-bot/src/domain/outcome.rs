//! The uniform result contract shared by both lookup subsystems.
//!
//! Every lookup produces either timed data or a [`LookupError`]. The
//! classification pipeline only ever matches on these, so riders never see
//! transport or parse errors directly.

use std::time::Instant;

use serde::Serialize;

/// Rider-facing message for tracker outages and unreadable tracker pages.
pub const UPSTREAM_DOWN_MESSAGE: &str = "Sorry, Bustracker is down";

/// Coarse failure category, used for logging and HTTP status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    NotFound,
    UpstreamDown,
    UnexpectedFormat,
}

/// A failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Input did not resolve to a stop or address.
    #[error("{0}")]
    NotFound(String),

    /// The upstream service could not be reached or returned an error status.
    #[error("{0}")]
    UpstreamDown(String),

    /// The upstream answered with a page we could not read.
    #[error("unexpected upstream format: {0}")]
    UnexpectedFormat(String),
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LookupError::NotFound(_) => FailureKind::NotFound,
            LookupError::UpstreamDown(_) => FailureKind::UpstreamDown,
            LookupError::UnexpectedFormat(_) => FailureKind::UnexpectedFormat,
        }
    }

    /// The text a rider may see. Format failures read as an outage.
    pub fn rider_message(&self) -> &str {
        match self {
            LookupError::NotFound(message) | LookupError::UpstreamDown(message) => message,
            LookupError::UnexpectedFormat(_) => UPSTREAM_DOWN_MESSAGE,
        }
    }
}

/// Lookup data plus how long the upstream call took.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timed<T> {
    pub data: T,
    pub timing_ms: u64,
}

impl<T> Timed<T> {
    pub fn new(data: T, timing_ms: u64) -> Self {
        Self { data, timing_ms }
    }
}

pub type LookupOutcome<T> = Result<Timed<T>, LookupError>;

/// Milliseconds since `start`, saturating.
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
