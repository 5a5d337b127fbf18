//! Request descriptor handed to a [`super::RequestExecutor`].

use http::Method;
use serde::Serialize;

use super::RequestError;

/// One logical API request: method, path, query, and optional JSON body.
///
/// Paths are relative to the API base URL and start with `/`, e.g.
/// `/api/v1/payments`. The descriptor is reused unchanged across retries.
///
/// # Example
///
/// ```
/// use invoice_ninja::api::ApiRequest;
///
/// let request = ApiRequest::get("/api/v1/invoices")
///     .with_query("client_id", "abc123")
///     .with_query("per_page", "50");
/// assert_eq!(request.query.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL
    pub path: String,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// Serialized JSON body
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Creates a request without query or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Sets an already serialized JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Encode`] if serialization fails.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, RequestError> {
        let bytes = serde_json::to_vec(body).map_err(RequestError::Encode)?;
        Ok(self.with_body(bytes))
    }
}
