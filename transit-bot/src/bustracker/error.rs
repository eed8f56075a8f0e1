//! Bus tracker client error types.

use super::parse::ParseError;

/// Errors from fetching or reading a departure page.
#[derive(Debug, thiserror::Error)]
pub enum BustrackerError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker returned a non-success status
    #[error("tracker returned status {status}")]
    Status { status: u16 },

    /// The page did not have the expected shape
    #[error("unreadable departure page: {source}")]
    Parse {
        #[source]
        source: ParseError,
        body: String,
    },
}
