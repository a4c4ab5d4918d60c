//! Monitor layer: from kernel datagrams to sink updates.
//!
//! This module provides:
//! - The per-interface monitor state ([`Monitor`]): receive buffer,
//!   oversized-datagram recovery and record dispatch
//! - Duplicate suppression ([`ChangeDetector`], [`Dispatch`])
//! - Error handling ([`MonitorError`])

mod change;
mod error;
mod state;


pub use change::{ChangeDetector, Dispatch};
pub use error::MonitorError;
pub use state::Monitor;
