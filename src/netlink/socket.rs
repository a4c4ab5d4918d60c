//! Linux rtnetlink socket.

use std::io;

use libc::{MSG_DONTWAIT, MSG_TRUNC};
use netlink_sys::protocols::NETLINK_ROUTE;
use netlink_sys::{Socket, SocketAddr};
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;

use super::channel::{EventChannel, ReadOutcome};
use super::encode;
use crate::network::AddressFilter;

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;

/// A non-blocking `NETLINK_ROUTE` socket subscribed to address notifications.
///
/// The socket is registered with the runtime's readiness driver on
/// creation, so [`NetlinkChannel::open`] must run inside a tokio runtime.
/// Dropping the channel deregisters and closes it.
#[derive(Debug)]
pub struct NetlinkChannel {
    socket: AsyncFd<Socket>,
    seq: u32,
    port: u32,
}

impl NetlinkChannel {
    /// Opens the socket, binds it and joins the notification groups of every
    /// family enabled in `filter`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the socket cannot be created, bound,
    /// subscribed or registered with the runtime.
    pub fn open(filter: &AddressFilter) -> io::Result<Self> {
        let mut socket = Socket::new(NETLINK_ROUTE)?;
        // Port 0: the kernel assigns one.
        let local: SocketAddr = socket.bind_auto()?;
        socket.set_non_blocking(true)?;

        for group in filter.groups() {
            socket.add_membership(group)?;
        }

        tracing::debug!(
            port = local.port_number(),
            groups = ?filter.groups(),
            "Subscribed to address notifications"
        );

        Ok(Self {
            socket: AsyncFd::with_interest(socket, Interest::READABLE)?,
            seq: 0,
            port: local.port_number(),
        })
    }
}

impl EventChannel for NetlinkChannel {
    async fn readable(&self) -> io::Result<()> {
        let mut guard = self.socket.readable().await?;
        guard.clear_ready();
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        loop {
            // With MSG_TRUNC the kernel copies at most `buf.len()` bytes and
            // reports the full datagram length.
            let mut window = &mut *buf;
            match self.socket.get_ref().recv(&mut window, MSG_TRUNC | MSG_DONTWAIT) {
                Ok(0) => return Ok(ReadOutcome::Closed),
                Ok(len) => return Ok(ReadOutcome::Datagram(len)),
                Err(e) => match e.kind() {
                    io::ErrorKind::WouldBlock => return Ok(ReadOutcome::WouldBlock),
                    io::ErrorKind::Interrupted => {}
                    _ => return Err(e),
                },
            }
        }
    }

    fn request_dump(&mut self, filter: &AddressFilter) -> io::Result<()> {
        self.seq = self.seq.wrapping_add(1);
        let request =
            encode::dump_request(filter.dump_family(), filter.interface, self.seq, self.port);

        let sent = self.socket.get_ref().send(&request, 0)?;
        if sent != request.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "short write of address dump request",
            ));
        }

        tracing::debug!(seq = self.seq, family = filter.dump_family(), "Requested address dump");
        Ok(())
    }
}
