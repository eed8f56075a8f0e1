//! GTFS loading error types.

use std::path::PathBuf;

/// Errors that can occur while loading a GTFS feed.
#[derive(Debug, thiserror::Error)]
pub enum GtfsError {
    /// A required file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was not valid CSV or lacked required columns
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The background load task panicked or was cancelled
    #[error("reload task failed: {0}")]
    Task(String),
}
