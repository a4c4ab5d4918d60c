//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Initial receive buffer size in bytes. Grows when a larger datagram arrives.
pub const BUFFER_SIZE: usize = 1024;

/// Default HTTP connect timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;
