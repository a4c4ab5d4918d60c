//! Network layer: which addresses matter, and on which interface.
//!
//! This module provides:
//! - The filter configuration ([`AddressFilter`], [`IpVersion`])
//! - Private range classification ([`is_private_address`])
//! - The pure record predicate ([`filter::accept`]) and address extraction
//! - Interface name resolution ([`resolve_interface`])

mod address;
pub mod filter;
mod interface;

pub use address::{AddressFilter, IpVersion, MAX_ADDRESS_TEXT_LEN, is_private_address};
pub use filter::{accept, extract_address};
pub use interface::{InterfaceError, resolve_interface};
