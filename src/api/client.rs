//! The [`InvoiceNinja`] client facade.

use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::transport::{DEFAULT_TIMEOUT, HttpResponse, ReqwestClient};

use super::{
    ApiRequest, BuildError, DEFAULT_BASE_URL, HttpExecutor, RateLimiter, RequestError,
    RequestExecutor, RetryConfig, RetryingExecutor,
};

/// Executor stack used by [`InvoiceNinja::new`].
pub type DefaultExecutor = RetryingExecutor<HttpExecutor<ReqwestClient>>;

/// Options for building the production client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API base URL
    pub base_url: String,
    /// Timeout for a single HTTP exchange
    pub timeout: Duration,
    /// Client-side rate limit
    pub requests_per_second: u32,
    /// Retry behavior
    pub retry: RetryConfig,
}

impl ClientOptions {
    /// Default client-side rate limit.
    pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            requests_per_second: Self::DEFAULT_REQUESTS_PER_SECOND,
            retry: RetryConfig::default(),
        }
    }
}

/// Typed client for the Invoice Ninja API.
///
/// Requests go through the executor `E`; by default that is the rate-limited,
/// retrying HTTP stack. Response bodies are decoded with `serde_json`.
///
/// # Example
///
/// ```no_run
/// use invoice_ninja::api::InvoiceNinja;
/// use invoice_ninja::models::{Invoice, ListResponse};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = InvoiceNinja::new("your-api-token")?;
/// let invoices: ListResponse<Invoice> =
///     client.get("/api/v1/invoices", &CancellationToken::new()).await?;
/// println!("{} invoices", invoices.data.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InvoiceNinja<E = DefaultExecutor> {
    executor: E,
}

impl InvoiceNinja<DefaultExecutor> {
    /// Creates a client for the production cloud with default options.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the HTTP client cannot be created or the
    /// token is not a valid header value.
    pub fn new(api_token: &str) -> Result<Self, BuildError> {
        Self::with_options(api_token, ClientOptions::default())
    }

    /// Creates a client with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the HTTP client cannot be created, the base
    /// URL is invalid, or the token is not a valid header value.
    ///
    /// # Panics
    ///
    /// Panics if `options.requests_per_second` is 0.
    pub fn with_options(api_token: &str, options: ClientOptions) -> Result<Self, BuildError> {
        let http = ReqwestClient::with_timeout(options.timeout)?;
        let inner = HttpExecutor::new(http, &options.base_url, api_token)?;
        let limiter = Arc::new(RateLimiter::new(options.requests_per_second));

        Ok(Self::from_executor(
            RetryingExecutor::new(inner, limiter).with_config(options.retry),
        ))
    }

    /// Replaces the retry configuration.
    pub fn set_retry_config(&mut self, config: RetryConfig) {
        self.executor.set_config(config);
    }

    /// Replaces the rate limiter with one allowing `requests_per_second`.
    ///
    /// # Panics
    ///
    /// Panics if `requests_per_second` is 0.
    pub fn set_rate_limit(&mut self, requests_per_second: u32) {
        self.executor.set_rate_limit(requests_per_second);
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.executor.inner().base_url()
    }
}

impl<E> InvoiceNinja<E> {
    /// Wraps an arbitrary executor.
    #[must_use]
    pub const fn from_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Returns the underlying executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: RequestExecutor> InvoiceNinja<E> {
    /// Executes a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] for API failures, transport failures, or
    /// cancellation.
    pub async fn execute(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        self.executor.execute(request, cancel).await
    }

    /// Executes a request and decodes the JSON response body.
    ///
    /// An empty body decodes as JSON `null`, so `T = ()` or `Option<_>`
    /// work for bodiless responses.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Decode`] if the body does not match `T`, or
    /// any error from [`Self::execute`].
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<T, RequestError> {
        let response = self.execute(request, cancel).await?;
        decode_body(&response.body)
    }

    /// Sends a request with an optional JSON body and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Encode`] if `body` cannot be serialized, or
    /// any error from [`Self::send`].
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_with_query(method, path, &[], body, cancel).await
    }

    /// Like [`Self::request`], with query parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn request_with_query<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = query
            .iter()
            .fold(ApiRequest::new(method, path), |r, (k, v)| r.with_query(*k, *v));
        if let Some(body) = body {
            request = request.with_json(body)?;
        }

        self.send(&request, cancel).await
    }

    /// Sends a GET request and decodes the response.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, RequestError> {
        self.send(&ApiRequest::get(path), cancel).await
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    let body = if body.is_empty() { b"null".as_slice() } else { body };
    serde_json::from_slice(body).map_err(RequestError::Decode)
}
