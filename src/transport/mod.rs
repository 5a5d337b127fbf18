//! HTTP transport used by the request executor.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction ([`HttpClient`])
//! - The production implementation ([`ReqwestClient`])
//! - Transport failures ([`HttpError`])

mod client;
mod error;
mod message;


pub use client::{DEFAULT_TIMEOUT, ReqwestClient};
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse};
