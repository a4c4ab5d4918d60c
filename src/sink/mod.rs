//! Notification sinks: where accepted addresses go.
//!
//! A [`Sink`] receives every address the change detector lets through.
//! [`PrintSink`] writes it out synchronously. [`HttpSink`] starts a request
//! and returns at once; the reactor later resumes it to drive the request to
//! completion.

mod http;
mod print;


use std::io;
use std::net::IpAddr;
use std::task::{Context, Poll};

use thiserror::Error;

use crate::webhook::TemplateError;

pub use http::HttpSink;
pub use print::PrintSink;

/// Error type for sink operations.
///
/// Every variant is fatal to the reactor. Failed HTTP deliveries are not
/// errors at this level; they are logged by the sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the address failed.
    #[error("Failed to write address: {0}")]
    Write(#[from] io::Error),

    /// The URL could not be built from the template.
    #[error("Failed to build URL: {0}")]
    Template(#[from] TemplateError),

    /// The sink has no asynchronous work to resume.
    #[error("Sink does not support resume")]
    ResumeUnsupported,
}

/// Destination for detected address changes.
pub trait Sink {
    /// Delivers a new address.
    ///
    /// Must not block on network I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if the address could not be handed off.
    fn update(&mut self, address: IpAddr) -> Result<(), SinkError>;

    /// Number of deliveries still in progress.
    fn in_flight(&self) -> usize {
        0
    }

    /// Drives in-progress deliveries.
    ///
    /// Returns `Ready(Ok(()))` once at least one delivery finished and its
    /// outcome was reported, `Pending` while all are still running.
    ///
    /// # Errors
    ///
    /// Sinks without asynchronous work return
    /// [`SinkError::ResumeUnsupported`].
    fn poll_resume(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), SinkError>> {
        let _ = cx;
        Poll::Ready(Err(SinkError::ResumeUnsupported))
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn update(&mut self, address: IpAddr) -> Result<(), SinkError> {
        (**self).update(address)
    }

    fn in_flight(&self) -> usize {
        (**self).in_flight()
    }

    fn poll_resume(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), SinkError>> {
        (**self).poll_resume(cx)
    }
}
