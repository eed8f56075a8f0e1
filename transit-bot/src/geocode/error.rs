//! Geocoder error types.

/// Errors that can occur when calling the geocoding API.
///
/// "No match" is not an error; these all mean the geocoder itself failed.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response status other than OK or ZERO_RESULTS
    #[error("geocoder status {status}{}", detail_suffix(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}
