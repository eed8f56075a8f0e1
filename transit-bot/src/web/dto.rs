//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::NearbyStop;
use crate::pipeline::Reply;

/// Incoming SMS webhook, as posted by Twilio.
#[derive(Debug, Deserialize)]
pub struct SmsRequest {
    /// Message text
    #[serde(rename = "Body", default)]
    pub body: String,

    /// Sender's phone number
    #[serde(rename = "From")]
    pub from: Option<String>,
}

/// Free-text query from the web channel.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub q: String,
}

/// Answer to a web query.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Action tag, e.g. "Stop Lookup"
    pub action: &'static str,

    /// Structured reply
    pub reply: Reply,

    /// The reply as SMS text
    pub text: String,
}

/// Coordinates as typed by the caller; parsed leniently.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    /// Nearest first
    pub stops: Vec<NearbyStop>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
