//! Inbound webhook receiver.
//!
//! This module provides:
//! - Signature verification ([`WebhookSecret`])
//! - The payload envelope and entity decoders ([`WebhookEvent`])
//! - Handler registration ([`HandlerRegistry`])
//! - Request handling ([`WebhookDispatcher`])

mod dispatcher;
mod event;
mod registry;
mod signature;


pub use dispatcher::{WebhookDispatcher, WebhookResponse};
pub use event::{
    CLIENT_CREATED, CLIENT_UPDATED, CREDIT_CREATED, DecodeError, INVOICE_CREATED,
    INVOICE_DELETED, INVOICE_UPDATED, PAYMENT_CREATED, PAYMENT_DELETED, PAYMENT_UPDATED,
    QUOTE_CREATED, WebhookEvent,
};
pub use registry::{HandlerError, HandlerRegistry};
pub use signature::{ALT_SIGNATURE_HEADER, SIGNATURE_HEADER, WebhookSecret};
