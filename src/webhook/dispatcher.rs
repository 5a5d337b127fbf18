//! Inbound webhook request handling.

use std::fmt::Display;
use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

use super::{
    ALT_SIGNATURE_HEADER, HandlerRegistry, SIGNATURE_HEADER, WebhookEvent, WebhookSecret,
};

/// Outcome of handling one webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    /// Status to answer with
    pub status: StatusCode,
    /// Plain-text body, empty on success
    pub body: String,
}

impl WebhookResponse {
    const fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            body: String::new(),
        }
    }

    fn error(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Converts into an `http::Response`.
    #[must_use]
    pub fn into_http(self) -> http::Response<String> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        response
    }
}

/// Verifies, decodes and routes inbound webhook requests.
///
/// The registry is frozen at construction, so one dispatcher can serve
/// concurrent requests through a shared reference or an `Arc`.
///
/// | Condition                       | Status |
/// |---------------------------------|--------|
/// | method is not POST              | 405    |
/// | body cannot be read             | 400    |
/// | signature missing or wrong      | 401    |
/// | body is not a valid envelope    | 400    |
/// | no handler for the event type   | 200    |
/// | handler failed                  | 500    |
/// | handler succeeded               | 200    |
#[derive(Debug)]
pub struct WebhookDispatcher {
    secret: Option<WebhookSecret>,
    registry: HandlerRegistry,
}

impl WebhookDispatcher {
    /// Creates a dispatcher.
    ///
    /// With `secret` set to `None`, signature verification is skipped.
    #[must_use]
    pub const fn new(secret: Option<WebhookSecret>, registry: HandlerRegistry) -> Self {
        Self { secret, registry }
    }

    /// Returns true if signatures are verified.
    #[must_use]
    pub const fn verifies_signatures(&self) -> bool {
        self.secret.is_some()
    }

    /// Handles one request.
    ///
    /// `body` is only awaited once the method has been accepted.
    pub async fn handle<F, E>(
        &self,
        method: &Method,
        headers: &HeaderMap,
        body: F,
    ) -> WebhookResponse
    where
        F: Future<Output = Result<Bytes, E>>,
        E: Display,
    {
        if *method != Method::POST {
            return WebhookResponse::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }

        let body = match body.await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read webhook body");
                return WebhookResponse::error(
                    StatusCode::BAD_REQUEST,
                    "Failed to read request body",
                );
            }
        };

        if let Some(secret) = &self.secret {
            let signature = signature_header(headers);
            if !signature.is_some_and(|s| secret.verify(&body, s)) {
                tracing::warn!(
                    present = signature.is_some(),
                    "Rejected webhook with invalid signature"
                );
                return WebhookResponse::error(StatusCode::UNAUTHORIZED, "Invalid signature");
            }
        }

        let event = match WebhookEvent::from_slice(&body) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed webhook payload");
                return WebhookResponse::error(
                    StatusCode::BAD_REQUEST,
                    "Failed to parse webhook payload",
                );
            }
        };

        match self.registry.dispatch(&event) {
            None => {
                tracing::debug!(event_type = %event.event_type, "No handler for webhook event");
                WebhookResponse::ok()
            }
            Some(Ok(())) => WebhookResponse::ok(),
            Some(Err(e)) => {
                tracing::error!(
                    event_type = %event.event_type,
                    error = %e,
                    "Webhook handler failed"
                );
                WebhookResponse::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Handler error: {e}"),
                )
            }
        }
    }

    /// Handles a request whose body is already buffered.
    pub async fn handle_request(&self, request: http::Request<Bytes>) -> WebhookResponse {
        let (parts, body) = request.into_parts();
        self.handle(
            &parts.method,
            &parts.headers,
            std::future::ready(Ok::<_, std::convert::Infallible>(body)),
        )
        .await
    }
}

/// Reads the primary signature header, falling back to the alternate name
/// when the primary is absent or empty.
fn signature_header(headers: &HeaderMap) -> Option<&str> {
    [SIGNATURE_HEADER, ALT_SIGNATURE_HEADER]
        .into_iter()
        .filter_map(|name| headers.get(name)?.to_str().ok())
        .find(|value| !value.is_empty())
}
