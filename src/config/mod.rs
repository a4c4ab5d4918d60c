//! Configuration layer for DDNS-Netlink.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The interface is required and has no default. The URL is optional: without
//! one, addresses are printed to stdout.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`-4`, `-6`, `--allow-private`, `--allow-temporary`) use OR semantics:
//! - If set `true` in either CLI or TOML, the result is `true`.
//! - Flags only enable, they cannot disable a TOML setting.
//! - If neither family is enabled anywhere, both are monitored.
//!
//! # TOML-Only Options
//!
//! - `monitor.buffer_size` (default: 1024) - Initial receive buffer size

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
