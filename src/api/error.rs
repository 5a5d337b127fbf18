//! Error taxonomy for outbound API requests.
//!
//! [`classify`] turns a failed HTTP response into an [`ApiError`];
//! [`RequestError`] is the single error type callers of the outbound path see.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::transport::{HttpError, HttpResponse};

use super::headers;

/// Semantic category of an API failure, derived purely from the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    BadRequest,
    /// 401: the API token is missing or wrong.
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 422: see [`ApiError::field_errors`].
    ValidationFailed,
    /// 429
    RateLimited,
    /// 500 and above.
    ServerError,
    /// Any other status.
    Unknown,
}

impl ErrorKind {
    /// Maps a status code to its kind.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            422 => Self::ValidationFailed,
            429 => Self::RateLimited,
            500.. => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Message used when the response body carries none.
    const fn default_message(self) -> Option<&'static str> {
        match self {
            Self::BadRequest => Some("bad request"),
            Self::Unauthorized => Some("unauthorized - check your API token"),
            Self::Forbidden => {
                Some("forbidden - you don't have permission to access this resource")
            }
            Self::NotFound => Some("resource not found"),
            Self::ValidationFailed => Some("validation error"),
            Self::RateLimited => Some("rate limit exceeded"),
            Self::ServerError => Some("server error"),
            Self::Unknown => None,
        }
    }
}

/// A failed API response, classified.
///
/// Immutable once built. `field_errors` is only populated for
/// [`ErrorKind::ValidationFailed`]; `retry_after` only when the response
/// carried a `Retry-After` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Semantic category of the failure.
    pub kind: ErrorKind,
    /// Message from the body, or a default for the status.
    pub message: String,
    /// Field name to validation messages, in the order the API sent them.
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Server-supplied hint for when to retry.
    pub retry_after: Option<Duration>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Classifies a failed response from its status code and raw body.
///
/// The body is decoded as `{"message": ..., "errors": {field: [..]}}` when
/// possible; otherwise, or when the message is empty, a default message for
/// the status is used. Pure and deterministic.
#[must_use]
pub fn classify(status: u16, body: &[u8]) -> ApiError {
    let kind = ErrorKind::from_status(status);
    let parsed = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<ErrorBody>(body).ok()
    };

    let (message, errors) = parsed.map_or((None, None), |b| (b.message, b.errors));
    let message = message
        .filter(|m| !m.is_empty())
        .or_else(|| kind.default_message().map(str::to_string))
        .unwrap_or_default();

    let field_errors = if kind == ErrorKind::ValidationFailed {
        errors.unwrap_or_default()
    } else {
        BTreeMap::new()
    };

    ApiError {
        status,
        kind,
        message,
        field_errors,
        retry_after: None,
    }
}

impl ApiError {
    /// Classifies a response and picks up its `Retry-After` hint.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let mut error = classify(response.status.as_u16(), &response.body);
        error.retry_after = headers::retry_after(&response.headers);
        error
    }

    /// Returns true for 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Returns true for 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    /// Returns true for 403.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.kind == ErrorKind::Forbidden
    }

    /// Returns true for 422.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        self.kind == ErrorKind::ValidationFailed
    }

    /// Returns true for 429.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.kind == ErrorKind::RateLimited
    }

    /// Returns true for 5xx.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.kind == ErrorKind::ServerError
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "Invoice Ninja API error (status {})", self.status)
        } else {
            write!(
                f,
                "Invoice Ninja API error (status {}): {}",
                self.status, self.message
            )
        }
    }
}

impl std::error::Error for ApiError {}

/// The wait for a rate-limit slot or a retry delay was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Request cancelled")]
pub struct Cancelled;

/// Error returned by the outbound request path.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The API answered with a failure status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response was obtained.
    #[error("Request failed: {0}")]
    Transport(#[from] HttpError),

    /// The caller's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request path could not be joined onto the base URL.
    #[error("Invalid request path '{path}': {reason}")]
    InvalidPath {
        /// The offending path
        path: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl From<Cancelled> for RequestError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl RequestError {
    /// Narrows to the classified API error, if this is one.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the kind of the classified API error, if this is one.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_api().map(|e| e.kind)
    }

    /// Returns true if the request was cancelled by the caller.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors building an API client.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The HTTP client could not be constructed.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The API token cannot be sent as a header value.
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,

    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },
}
