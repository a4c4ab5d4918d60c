//! The monitor: kernel channel, receive buffer, filter and change detector.

use tracing::{debug, trace, warn};

use super::{ChangeDetector, MonitorError};
use crate::netlink::{EventChannel, ReadOutcome, Record, decode};
use crate::network::{AddressFilter, accept, extract_address};
use crate::sink::Sink;

/// Watches one interface through an [`EventChannel`].
///
/// Owns the channel and the receive buffer exclusively. Dropping the
/// monitor closes the channel.
#[derive(Debug)]
pub struct Monitor<C> {
    channel: C,
    filter: AddressFilter,
    buf: Vec<u8>,
    detector: ChangeDetector,
}

impl<C: EventChannel> Monitor<C> {
    /// Creates a monitor with an initial receive buffer of `buffer_size`
    /// bytes. The buffer grows when the kernel sends larger datagrams.
    pub fn new(channel: C, filter: AddressFilter, buffer_size: usize) -> Self {
        Self {
            channel,
            filter,
            buf: vec![0; buffer_size.max(1)],
            detector: ChangeDetector::new(),
        }
    }

    /// The filter records are checked against.
    pub const fn filter(&self) -> &AddressFilter {
        &self.filter
    }

    /// Current receive buffer size.
    pub fn buffer_size(&self) -> usize {
        self.buf.len()
    }

    /// The change detector's state.
    pub const fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Asks the kernel for every current address.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Dump`] if the request cannot be sent.
    pub fn request_dump(&mut self) -> Result<(), MonitorError> {
        self.channel
            .request_dump(&self.filter)
            .map_err(MonitorError::Dump)
    }

    /// Waits until the channel may have datagrams pending.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Wait`] if readiness cannot be awaited.
    pub async fn readable(&self) -> Result<(), MonitorError> {
        self.channel.readable().await.map_err(MonitorError::Wait)
    }

    /// Reads and processes datagrams until the channel would block.
    ///
    /// Every accepted, changed address is handed to `sink` in the order the
    /// kernel reported it.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel fails or closes, the kernel reports
    /// an error, a resync dump cannot be requested, or the sink fails.
    pub fn process_ready<S: Sink + ?Sized>(&mut self, sink: &mut S) -> Result<(), MonitorError> {
        loop {
            match self.recv()? {
                ReadOutcome::WouldBlock => return Ok(()),
                ReadOutcome::Closed => return Err(MonitorError::Closed),
                ReadOutcome::Datagram(len) if len > self.buf.len() => self.resync(len)?,
                ReadOutcome::Datagram(len) => self.process_datagram(len, sink)?,
            }
        }
    }

    fn recv(&mut self) -> Result<ReadOutcome, MonitorError> {
        self.channel
            .recv(&mut self.buf)
            .map_err(MonitorError::Receive)
    }

    /// Recovers from a truncated datagram.
    ///
    /// The truncated content is unusable: grow the buffer, throw away
    /// whatever else is queued, and ask for a fresh dump.
    fn resync(&mut self, needed: usize) -> Result<(), MonitorError> {
        warn!(
            needed,
            capacity = self.buf.len(),
            "Kernel datagram truncated, growing buffer and resynchronizing"
        );
        self.buf.resize(needed, 0);

        let mut discarded = 0usize;
        loop {
            match self.recv()? {
                ReadOutcome::WouldBlock => break,
                ReadOutcome::Closed => return Err(MonitorError::Closed),
                ReadOutcome::Datagram(_) => discarded += 1,
            }
        }
        if discarded > 0 {
            debug!(discarded, "Discarded queued datagrams before resync");
        }

        self.request_dump()
    }

    fn process_datagram<S: Sink + ?Sized>(
        &mut self,
        len: usize,
        sink: &mut S,
    ) -> Result<(), MonitorError> {
        for record in decode(&self.buf[..len]) {
            match record {
                Record::NewAddress(message) => {
                    let Some(attribute) = accept(&self.filter, &message) else {
                        trace!(
                            family = message.family,
                            index = message.index,
                            scope = message.scope,
                            "Address record filtered out"
                        );
                        continue;
                    };

                    match extract_address(&message, &attribute) {
                        Some(address) => {
                            self.detector.maybe_dispatch(address, sink)?;
                        }
                        None => warn!(
                            family = message.family,
                            payload_len = attribute.payload.len(),
                            "Accepted address record has no usable address, skipping"
                        ),
                    }
                }
                Record::Error(0) => trace!("Kernel acknowledgement"),
                Record::Error(code) => {
                    return Err(MonitorError::Kernel(std::io::Error::from_raw_os_error(
                        code,
                    )));
                }
                Record::Done => debug!("Address dump complete"),
                Record::Other(kind) => trace!(kind, "Ignoring record"),
            }
        }
        Ok(())
    }
}
