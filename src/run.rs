//! Application execution logic.
//!
//! `serve` mounts the webhook dispatcher on an axum router; `get` performs
//! one rate-limited, retrying API call and prints the JSON response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use thiserror::Error;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use invoice_ninja::api::{ApiRequest, BuildError, InvoiceNinja, RateLimitInfo, RequestError};
use invoice_ninja::config::ValidatedConfig;
use invoice_ninja::webhook::{HandlerError, HandlerRegistry, WebhookDispatcher, WebhookEvent};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Largest webhook body the server buffers.
const MAX_WEBHOOK_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to bind the webhook listener.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The webhook server stopped with an error.
    #[error("Webhook server failed: {0}")]
    Serve(#[source] std::io::Error),

    /// Failed to build the API client.
    #[error("Failed to build API client: {0}")]
    Client(#[from] BuildError),

    /// The API request failed.
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// The response body is not JSON.
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// Serves the webhook endpoint until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
#[cfg(not(tarpaulin_include))]
pub async fn serve(config: ValidatedConfig) -> Result<(), RunError> {
    let dispatcher = WebhookDispatcher::new(config.webhook_secret.clone(), logging_registry());
    if !dispatcher.verifies_signatures() {
        tracing::warn!("No webhook secret configured, signatures are not verified");
    }

    let app = router(&config.webhook_path, Arc::new(dispatcher));
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|source| RunError::Bind {
            addr: config.listen,
            source,
        })?;

    tracing::info!(
        addr = %config.listen,
        path = %config.webhook_path,
        "Listening for webhooks"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RunError::Serve)?;

    tracing::info!("Shutdown signal received, stopped");
    Ok(())
}

/// Performs a GET request and returns the pretty-printed JSON body.
///
/// Ctrl+C cancels the request, including any rate-limit wait or backoff.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the request fails, or
/// the response is not JSON.
#[cfg(not(tarpaulin_include))]
pub async fn get(
    config: &ValidatedConfig,
    token: &str,
    request: &ApiRequest,
) -> Result<String, RunError> {
    let client = InvoiceNinja::with_options(token, config.client_options())?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let watcher = tokio::spawn(async move {
        shutdown_signal().await;
        on_signal.cancel();
    });

    let result = client.execute(request, &cancel).await;
    watcher.abort();
    let response = result?;

    log_rate_limit(&RateLimitInfo::from_headers(&response.headers));
    render_json(&response.body)
}

/// Builds the GET request for the `get` subcommand.
pub fn get_request(path: &str, query: Vec<(String, String)>) -> ApiRequest {
    query
        .into_iter()
        .fold(ApiRequest::get(path), |request, (key, value)| {
            request.with_query(key, value)
        })
}

/// Pretty-prints a JSON response body; an empty body prints as `null`.
fn render_json(body: &[u8]) -> Result<String, RunError> {
    let body = if body.is_empty() { b"null".as_slice() } else { body };
    let value: serde_json::Value = serde_json::from_slice(body).map_err(RunError::InvalidJson)?;
    serde_json::to_string_pretty(&value).map_err(RunError::InvalidJson)
}

fn log_rate_limit(info: &RateLimitInfo) {
    if let (Some(limit), Some(remaining)) = (info.limit, info.remaining) {
        tracing::debug!(limit, remaining, "Server rate limit");
    }
}

/// Routes every method on `path` to the dispatcher, which answers 405 itself.
fn router(path: &str, dispatcher: Arc<WebhookDispatcher>) -> Router {
    Router::new()
        .route(path, any(handle_webhook))
        .with_state(dispatcher)
}

async fn handle_webhook(
    State(dispatcher): State<Arc<WebhookDispatcher>>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();
    let response = dispatcher
        .handle(
            &parts.method,
            &parts.headers,
            axum::body::to_bytes(body, MAX_WEBHOOK_BODY_BYTES),
        )
        .await;

    (response.status, response.body).into_response()
}

/// Handlers for the built-in event types that log what arrived.
fn logging_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .on_invoice_created(log_invoice)
        .on_invoice_updated(log_invoice)
        .on_invoice_deleted(log_invoice)
        .on_payment_created(log_payment)
        .on_payment_updated(log_payment)
        .on_payment_deleted(log_payment)
        .on_client_created(log_client)
        .on_client_updated(log_client)
        .on_credit_created(log_credit)
        .on_quote_created(log_other)
}

fn log_invoice(event: &WebhookEvent) -> Result<(), HandlerError> {
    let invoice = event.invoice()?;
    tracing::info!(
        event = %event.event_type,
        id = %invoice.id,
        number = %invoice.number,
        "Invoice event"
    );
    Ok(())
}

fn log_payment(event: &WebhookEvent) -> Result<(), HandlerError> {
    let payment = event.payment()?;
    tracing::info!(
        event = %event.event_type,
        id = %payment.id,
        amount = payment.amount,
        invoices = payment.invoices.len(),
        "Payment event"
    );
    Ok(())
}

fn log_client(event: &WebhookEvent) -> Result<(), HandlerError> {
    let client = event.client()?;
    tracing::info!(
        event = %event.event_type,
        id = %client.id,
        name = %client.name,
        "Client event"
    );
    Ok(())
}

fn log_credit(event: &WebhookEvent) -> Result<(), HandlerError> {
    let credit = event.credit()?;
    tracing::info!(
        event = %event.event_type,
        id = %credit.id,
        number = %credit.number,
        "Credit event"
    );
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // signature fixed by HandlerRegistry
fn log_other(event: &WebhookEvent) -> Result<(), HandlerError> {
    tracing::info!(event = %event.event_type, bytes = event.data().len(), "Webhook event");
    Ok(())
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal source is ignored.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
