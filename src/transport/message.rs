//! Wire-level request and response values, and the client seam.

use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use url::Url;

use super::HttpError;

/// One outbound HTTP exchange, fully resolved.
///
/// Built by [`crate::api::HttpExecutor`] from an [`crate::api::ApiRequest`]:
/// the URL already carries the query string and the headers already carry
/// the API token.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method
    pub method: Method,
    /// Absolute URL including query
    pub url: Url,
    /// Headers to send
    pub headers: HeaderMap,
    /// Body bytes, if any
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a header, replacing any earlier value under the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A buffered HTTP response, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers, including `X-RateLimit-*` and `Retry-After`
    pub headers: HeaderMap,
    /// Entire body
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Status 400 or above, which the executor turns into an `ApiError`.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// Body as UTF-8, or `None` if it is not valid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// First value of `name` as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Sends [`HttpRequest`]s.
///
/// Error statuses come back as `Ok` responses; classifying them is the
/// executor's job. Tests implement this with scripted responses.
pub trait HttpClient: Send + Sync {
    /// Performs one exchange.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] only when no response was received at all
    /// (connection failure, timeout, unusable URL).
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}
