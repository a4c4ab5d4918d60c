//! Webhook layer for delivering address updates over HTTP.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - URL templates with an address placeholder ([`UrlTemplate`])
//! - Driving concurrent requests from an event loop ([`TransferEngine`])

mod client;
mod engine;
mod error;
mod http;
mod template;

#[cfg(test)]
mod http_tests;

pub use client::ReqwestClient;
pub use engine::{Completion, RequestId, TransferEngine};
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use template::{PLACEHOLDER, TemplateError, UrlTemplate};
