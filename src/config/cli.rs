//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// DDNS-Netlink: interface address monitor
///
/// Watches one network interface for new addresses and prints each change,
/// or sends it to URL with every `<ipaddr>` replaced by the address.
#[derive(Debug, Parser)]
#[command(name = "ddns-netlink")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Interface to monitor (required for run mode)
    #[arg(value_name = "INTERFACE")]
    pub interface: Option<String>,

    /// URL template; without one, addresses are printed to stdout
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Monitor IPv4 addresses
    #[arg(short = '4', long)]
    pub ipv4: bool,

    /// Monitor IPv6 addresses
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Accept addresses in private ranges
    #[arg(short = 'p', long = "allow-private")]
    pub allow_private: bool,

    /// Accept temporary (privacy extension) addresses
    #[arg(short = 't', long = "allow-temporary")]
    pub allow_temporary: bool,

    /// HTTP connect timeout in seconds
    #[arg(long = "connect-timeout", value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for ddns-netlink
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "ddns-netlink.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning clap's error on
    /// invalid input instead of exiting.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags, bad values, or help/version
    /// requests.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
