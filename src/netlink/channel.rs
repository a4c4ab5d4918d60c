//! The kernel event channel seam.

use std::future::Future;
use std::io;

use crate::network::AddressFilter;

/// Result of one non-blocking receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A datagram was received. The value is its true length, which may be
    /// larger than the buffer it was copied into.
    Datagram(usize),
    /// Nothing is pending.
    WouldBlock,
    /// The kernel end of the channel is gone.
    Closed,
}

/// A non-blocking datagram source of rtnetlink address notifications.
///
/// Implemented by [`NetlinkChannel`](super::NetlinkChannel) on Linux and by
/// in-memory fakes in tests.
pub trait EventChannel {
    /// Waits until the channel may have datagrams pending.
    ///
    /// Readiness is consumed by this call: the caller must then read until
    /// [`ReadOutcome::WouldBlock`] before waiting again.
    fn readable(&self) -> impl Future<Output = io::Result<()>>;

    /// Receives one datagram into `buf` without blocking.
    ///
    /// # Errors
    ///
    /// Returns any receive error other than would-block.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome>;

    /// Asks the kernel to report every current address of the families
    /// enabled in `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    fn request_dump(&mut self, filter: &AddressFilter) -> io::Result<()>;
}
