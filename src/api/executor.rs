//! The request executor: turns an [`ApiRequest`] into one HTTP exchange.

use std::future::Future;

use http::{HeaderName, HeaderValue, header};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::transport::{HttpClient, HttpRequest, HttpResponse};

use super::{ApiError, ApiRequest, BuildError, RequestError};

/// Production Invoice Ninja cloud endpoint.
pub const DEFAULT_BASE_URL: &str = "https://invoicing.co";

/// Public demo endpoint.
pub const DEMO_BASE_URL: &str = "https://demo.invoiceninja.com";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("invoice-ninja-rs/", env!("CARGO_PKG_VERSION"));

const API_TOKEN_HEADER: &str = "x-api-token";
const REQUESTED_WITH_HEADER: &str = "x-requested-with";

/// Performs a single API request.
///
/// Implementations return the response for any status below 400 and a
/// [`RequestError`] otherwise: [`RequestError::Api`] for failure statuses,
/// [`RequestError::Transport`] when no response was obtained. Decorators
/// such as [`super::RetryingExecutor`] implement this trait as well, so
/// resilience layers compose around any executor.
pub trait RequestExecutor: Send + Sync {
    /// Executes `request`, aborting promptly if `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] as described on the trait.
    fn execute(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<HttpResponse, RequestError>> + Send;
}

/// [`RequestExecutor`] that talks to the API over an [`HttpClient`].
///
/// Resolves paths against the base URL, attaches the API token and JSON
/// headers, and classifies failure statuses.
#[derive(Debug, Clone)]
pub struct HttpExecutor<H> {
    client: H,
    base_url: String,
    token: HeaderValue,
}

impl<H> HttpExecutor<H> {
    /// Creates an executor for the given base URL and API token.
    ///
    /// A trailing `/` on the base URL is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidBaseUrl`] if the base URL is not an
    /// absolute http(s) URL, or [`BuildError::InvalidToken`] if the token
    /// is not a valid header value.
    pub fn new(client: H, base_url: &str, api_token: &str) -> Result<Self, BuildError> {
        let parsed = Url::parse(base_url).map_err(|e| BuildError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BuildError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let mut token = HeaderValue::from_str(api_token).map_err(|_| BuildError::InvalidToken)?;
        token.set_sensitive(true);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Returns the base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves the full URL of a request, including its query string.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidPath`] if the path does not start with
    /// `/` or does not form a valid URL.
    pub fn resolve_url(&self, request: &ApiRequest) -> Result<Url, RequestError> {
        if !request.path.starts_with('/') {
            return Err(RequestError::InvalidPath {
                path: request.path.clone(),
                reason: "must start with '/'".to_string(),
            });
        }

        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path)).map_err(|e| {
            RequestError::InvalidPath {
                path: request.path.clone(),
                reason: e.to_string(),
            }
        })?;

        // Appended after any query already written into the path
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }

    fn build_request(&self, request: &ApiRequest) -> Result<HttpRequest, RequestError> {
        let json = HeaderValue::from_static("application/json");
        let mut http_request = HttpRequest::new(request.method.clone(), self.resolve_url(request)?)
            .with_header(
                HeaderName::from_static(API_TOKEN_HEADER),
                self.token.clone(),
            )
            .with_header(
                HeaderName::from_static(REQUESTED_WITH_HEADER),
                HeaderValue::from_static("XMLHttpRequest"),
            )
            .with_header(header::CONTENT_TYPE, json.clone())
            .with_header(header::ACCEPT, json)
            .with_header(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

        if let Some(body) = &request.body {
            http_request = http_request.with_body(body.clone());
        }

        Ok(http_request)
    }
}

impl<H: HttpClient> RequestExecutor for HttpExecutor<H> {
    async fn execute(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        let http_request = self.build_request(request)?;

        let response = tokio::select! {
            result = self.client.request(http_request) => result?,
            () = cancel.cancelled() => return Err(RequestError::Cancelled),
        };

        if response.is_error() {
            return Err(ApiError::from_response(&response).into());
        }

        Ok(response)
    }
}
