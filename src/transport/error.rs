//! Error types for the HTTP transport.

use thiserror::Error;

/// A failure to obtain any HTTP response at all.
///
/// Describes what went wrong at the transport level without dictating
/// recovery strategy. Responses with an error status are *not* transport
/// errors; they are classified by [`crate::api::ApiError`].
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS failures, and errors while streaming the response body.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The request URL is invalid.
    ///
    /// This indicates a configuration error rather than a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Setup(String),
}
