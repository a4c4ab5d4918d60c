//! Error types for the monitor layer.

use std::io;

use thiserror::Error;

use crate::sink::SinkError;

/// Error type for monitor operations.
///
/// Every variant is fatal: the reactor stops and the process exits.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Waiting for channel readiness failed.
    #[error("Failed to wait for kernel events: {0}")]
    Wait(#[source] io::Error),

    /// Receiving from the channel failed.
    #[error("Failed to read kernel events: {0}")]
    Receive(#[source] io::Error),

    /// The kernel closed the channel.
    #[error("Kernel event channel closed")]
    Closed,

    /// The address dump request could not be sent.
    #[error("Failed to request address dump: {0}")]
    Dump(#[source] io::Error),

    /// The kernel answered with an error record.
    #[error("Kernel reported an error: {0}")]
    Kernel(#[source] io::Error),

    /// The sink rejected an update.
    #[error(transparent)]
    Sink(#[from] SinkError),
}
