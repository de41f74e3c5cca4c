use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlertsError>;

/// Everything that can go wrong between reading the API key and printing
/// the projected alerts.
#[derive(Error, Debug)]
pub enum AlertsError {
    /// The API key environment variable is unset or empty.
    #[error("{0} is missing")]
    MissingApiKey(&'static str),

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The feed answered with a non-success status. The raw body is kept
    /// for diagnostics.
    #[error("feed returned HTTP {status}")]
    Upstream { status: StatusCode, body: String },

    /// The response body is not valid JSON or does not match the feed
    /// schema.
    #[error("could not decode feed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An active period timestamp could not be read as epoch seconds.
    #[error("active period timestamp {0:?} is not an integer")]
    BadTimestamp(String),
}
