//! Invoice Ninja API client and webhook receiver.
//!
//! The outbound side ([`api`]) sends requests through a client-side rate
//! limiter and a retry loop with exponential backoff, and turns error
//! responses into classified [`api::ApiError`] values. The inbound side
//! ([`webhook`]) verifies HMAC signatures and routes events to handlers.

pub mod api;
pub mod config;
pub mod models;
pub mod time;
pub mod transport;
pub mod webhook;
