//! Event-type to handler registry.

use std::collections::HashMap;
use std::fmt;

use super::WebhookEvent;
use super::event::{
    CLIENT_CREATED, CLIENT_UPDATED, CREDIT_CREATED, INVOICE_CREATED, INVOICE_DELETED,
    INVOICE_UPDATED, PAYMENT_CREATED, PAYMENT_DELETED, PAYMENT_UPDATED, QUOTE_CREATED,
};

/// Failure reported by an event handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler = Box<dyn Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync>;

/// Maps event types to handlers.
///
/// Keys match exactly and case-sensitively. Registering a second handler for
/// the same event type replaces the first. Build the registry fully, then
/// move it into a [`super::WebhookDispatcher`], which never mutates it.
///
/// # Example
///
/// ```
/// use invoice_ninja::webhook::HandlerRegistry;
///
/// let registry = HandlerRegistry::new()
///     .on_invoice_created(|event| {
///         let invoice = event.invoice()?;
///         println!("new invoice {}", invoice.number);
///         Ok(())
///     })
///     .on("task.created", |_| Ok(()));
///
/// assert!(registry.contains("invoice.created"));
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event_type`, replacing any earlier one.
    #[must_use]
    pub fn on<F>(mut self, event_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(event_type.into(), Box::new(handler));
        self
    }

    /// Registers a handler for `invoice.created`.
    #[must_use]
    pub fn on_invoice_created<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(INVOICE_CREATED, handler)
    }

    /// Registers a handler for `invoice.updated`.
    #[must_use]
    pub fn on_invoice_updated<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(INVOICE_UPDATED, handler)
    }

    /// Registers a handler for `invoice.deleted`.
    #[must_use]
    pub fn on_invoice_deleted<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(INVOICE_DELETED, handler)
    }

    /// Registers a handler for `payment.created`.
    #[must_use]
    pub fn on_payment_created<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(PAYMENT_CREATED, handler)
    }

    /// Registers a handler for `payment.updated`.
    #[must_use]
    pub fn on_payment_updated<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(PAYMENT_UPDATED, handler)
    }

    /// Registers a handler for `payment.deleted`.
    #[must_use]
    pub fn on_payment_deleted<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(PAYMENT_DELETED, handler)
    }

    /// Registers a handler for `client.created`.
    #[must_use]
    pub fn on_client_created<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(CLIENT_CREATED, handler)
    }

    /// Registers a handler for `client.updated`.
    #[must_use]
    pub fn on_client_updated<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(CLIENT_UPDATED, handler)
    }

    /// Registers a handler for `credit.created`.
    #[must_use]
    pub fn on_credit_created<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(CREDIT_CREATED, handler)
    }

    /// Registers a handler for `quote.created`.
    #[must_use]
    pub fn on_quote_created<F>(self, handler: F) -> Self
    where
        F: Fn(&WebhookEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(QUOTE_CREATED, handler)
    }

    /// Returns true if a handler is registered for `event_type`.
    #[must_use]
    pub fn contains(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// Number of registered event types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invokes the handler for the event's type.
    ///
    /// Returns `None` if no handler is registered.
    pub(crate) fn dispatch(&self, event: &WebhookEvent) -> Option<Result<(), HandlerError>> {
        self.handlers.get(&event.event_type).map(|handler| handler(event))
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut event_types: Vec<_> = self.handlers.keys().collect();
        event_types.sort();
        f.debug_struct("HandlerRegistry")
            .field("event_types", &event_types)
            .finish()
    }
}
