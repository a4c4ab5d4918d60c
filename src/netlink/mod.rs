//! The kernel side: rtnetlink address notifications.
//!
//! - [`wire`]: message layout constants shared by encoder and decoder
//! - [`decode`]: bounds-checked iterator over the records of one datagram
//! - [`encode`]: the dump request, plus kernel-side records for tests and
//!   fuzzing without a live kernel
//! - [`EventChannel`]: the non-blocking datagram source the monitor reads,
//!   implemented for Linux by [`NetlinkChannel`]

mod channel;
pub mod decode;
pub mod encode;
#[cfg(target_os = "linux")]
mod socket;
pub mod wire;

pub use channel::{EventChannel, ReadOutcome};
pub use decode::{AddressMessage, Attribute, Attributes, Messages, Record, decode};
pub use encode::{AddressRecord, dump_request};
#[cfg(target_os = "linux")]
pub use socket::NetlinkChannel;
