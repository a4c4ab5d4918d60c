//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// HTTP delivery configuration
    #[serde(default)]
    pub http: HttpSection,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Interface name
    pub interface: Option<String>,

    /// Monitor IPv4 addresses
    #[serde(default)]
    pub ipv4: bool,

    /// Monitor IPv6 addresses
    #[serde(default)]
    pub ipv6: bool,

    /// Accept addresses in private ranges
    #[serde(default)]
    pub allow_private: bool,

    /// Accept temporary addresses
    #[serde(default)]
    pub allow_temporary: bool,

    /// Initial receive buffer size in bytes
    pub buffer_size: Option<usize>,
}

/// HTTP delivery configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// URL template containing `<ipaddr>` placeholders
    pub url: Option<String>,

    /// Connect timeout in seconds
    pub connect_timeout: Option<u64>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# DDNS-Netlink Configuration File

[monitor]
# Interface to monitor (required unless given on the command line)
# interface = "eth0"

# Address families to monitor. If neither is enabled, both are.
# ipv4 = true
# ipv6 = true

# Accept addresses in private ranges (10/8, 172.16/12, 192.168/16, fc00::/7)
# allow_private = false

# Accept temporary (privacy extension) IPv6 addresses
# allow_temporary = false

# Initial receive buffer size in bytes, grown on demand (default: 1024)
# buffer_size = 1024

[http]
# URL template; every <ipaddr> is replaced with the new address.
# Without a URL, addresses are printed to stdout.
# url = "https://api.example.com/update?ip=<ipaddr>"

# Connect timeout in seconds (default: 10)
# connect_timeout = 10

# Request timeout in seconds (default: 30)
# timeout = 30
"#
    .to_string()
}
