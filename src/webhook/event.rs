//! Webhook event envelope and payload decoders.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::models::{Client, Credit, Invoice, Payment};

/// `invoice.created`
pub const INVOICE_CREATED: &str = "invoice.created";
/// `invoice.updated`
pub const INVOICE_UPDATED: &str = "invoice.updated";
/// `invoice.deleted`
pub const INVOICE_DELETED: &str = "invoice.deleted";
/// `payment.created`
pub const PAYMENT_CREATED: &str = "payment.created";
/// `payment.updated`
pub const PAYMENT_UPDATED: &str = "payment.updated";
/// `payment.deleted`
pub const PAYMENT_DELETED: &str = "payment.deleted";
/// `client.created`
pub const CLIENT_CREATED: &str = "client.created";
/// `client.updated`
pub const CLIENT_UPDATED: &str = "client.updated";
/// `credit.created`
pub const CREDIT_CREATED: &str = "credit.created";
/// `quote.created`
pub const QUOTE_CREATED: &str = "quote.created";

/// A decoded webhook payload: the event type plus its raw `data` member.
///
/// `data` is kept as raw JSON and only decoded when a handler asks for a
/// specific entity shape.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    /// Event type such as `invoice.created`
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

/// The event payload did not match the requested entity shape.
#[derive(Debug, Error)]
#[error("Failed to parse {entity} data: {source}")]
pub struct DecodeError {
    /// Name of the requested entity
    pub entity: &'static str,
    /// Underlying JSON error
    #[source]
    pub source: serde_json::Error,
}

impl WebhookEvent {
    /// Parses an envelope from a raw request body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `body` is not a JSON object of the
    /// expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Returns the raw JSON of the `data` member, `null` if absent.
    #[must_use]
    pub fn data(&self) -> &str {
        self.data.as_deref().map_or("null", RawValue::get)
    }

    /// Decodes `data` into `T`, naming `entity` in the error.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if `data` does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self, entity: &'static str) -> Result<T, DecodeError> {
        serde_json::from_str(self.data()).map_err(|source| DecodeError { entity, source })
    }

    /// Decodes `data` as an [`Invoice`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if `data` is not an invoice object.
    pub fn invoice(&self) -> Result<Invoice, DecodeError> {
        self.decode("invoice")
    }

    /// Decodes `data` as a [`Payment`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if `data` is not a payment object.
    pub fn payment(&self) -> Result<Payment, DecodeError> {
        self.decode("payment")
    }

    /// Decodes `data` as a [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if `data` is not a client object.
    pub fn client(&self) -> Result<Client, DecodeError> {
        self.decode("client")
    }

    /// Decodes `data` as a [`Credit`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if `data` is not a credit object.
    pub fn credit(&self) -> Result<Credit, DecodeError> {
        self.decode("credit")
    }
}
