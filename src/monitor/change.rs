//! Change detection: only new addresses reach the sink.

use std::net::IpAddr;

use crate::sink::{Sink, SinkError};

/// Outcome of offering an address to the [`ChangeDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The address differed from the last one and was handed to the sink.
    Invoked,
    /// The address equals the last dispatched one.
    Suppressed,
}

/// Remembers the last dispatched address and drops repeats of it.
///
/// Before the first dispatch there is no last address, so the first address
/// offered is always dispatched.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last: Option<IpAddr>,
}

impl ChangeDetector {
    /// Creates a detector that has dispatched nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// The last address handed to the sink.
    #[must_use]
    pub const fn last(&self) -> Option<IpAddr> {
        self.last
    }

    /// Hands `address` to `sink` unless it equals the last dispatched one.
    ///
    /// The last address only moves forward when the sink accepts the update.
    ///
    /// # Errors
    ///
    /// Propagates the sink's error.
    pub fn maybe_dispatch<S: Sink + ?Sized>(
        &mut self,
        address: IpAddr,
        sink: &mut S,
    ) -> Result<Dispatch, SinkError> {
        if self.last == Some(address) {
            tracing::debug!(%address, "Address unchanged, not dispatching");
            return Ok(Dispatch::Suppressed);
        }

        sink.update(address)?;
        tracing::info!(%address, previous = ?self.last, "Address changed");
        self.last = Some(address);
        Ok(Dispatch::Invoked)
    }
}
