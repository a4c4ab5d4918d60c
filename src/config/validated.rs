//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::time::Duration;

use crate::network::{AddressFilter, IpVersion};
use crate::webhook::UrlTemplate;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Documentation addresses substituted into the template during validation.
const SAMPLE_V4: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
const SAMPLE_V6: IpAddr = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Interface name, resolved to an index at startup
    pub interface: String,

    /// Address families to monitor
    pub ip_version: IpVersion,

    /// Accept addresses in private ranges
    pub allow_private: bool,

    /// Accept temporary addresses
    pub allow_temporary: bool,

    /// Initial receive buffer size
    pub buffer_size: usize,

    /// URL template; `None` selects the print sink
    pub url: Option<UrlTemplate>,

    /// HTTP connect timeout
    pub connect_timeout: Duration,

    /// HTTP request timeout
    pub timeout: Duration,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.url.as_ref().map_or("none (print)", UrlTemplate::as_str);

        write!(
            f,
            "Config {{ interface: {}, ip_version: {}, allow_private: {}, allow_temporary: {}, \
             url: {}, connect_timeout: {}s, timeout: {}s, buffer: {} }}",
            self.interface,
            self.ip_version,
            self.allow_private,
            self.allow_temporary,
            url,
            self.connect_timeout.as_secs(),
            self.timeout.as_secs(),
            self.buffer_size,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The interface is missing
    /// - The URL template is not a valid URL once an address is substituted
    /// - A timeout or the buffer size is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let interface = Self::resolve_interface(cli, toml)?;

        // Flags only enable: set in either source means set
        let ipv4 = cli.ipv4 || toml.is_some_and(|t| t.monitor.ipv4);
        let ipv6 = cli.ipv6 || toml.is_some_and(|t| t.monitor.ipv6);
        let ip_version = IpVersion::from_flags(ipv4, ipv6);

        let allow_private = cli.allow_private || toml.is_some_and(|t| t.monitor.allow_private);
        let allow_temporary =
            cli.allow_temporary || toml.is_some_and(|t| t.monitor.allow_temporary);

        let buffer_size = Self::resolve_buffer_size(toml)?;
        let url = Self::resolve_url(cli, toml, ip_version)?;

        let connect_timeout = resolve_duration(
            "connect_timeout",
            cli.connect_timeout
                .or_else(|| toml.and_then(|t| t.http.connect_timeout)),
            defaults::CONNECT_TIMEOUT_SECS,
        )?;
        let timeout = resolve_duration(
            "timeout",
            cli.timeout.or_else(|| toml.and_then(|t| t.http.timeout)),
            defaults::TIMEOUT_SECS,
        )?;

        Ok(Self {
            interface,
            ip_version,
            allow_private,
            allow_temporary,
            buffer_size,
            url,
            connect_timeout,
            timeout,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Builds the address filter for the resolved interface index.
    #[must_use]
    pub const fn filter(&self, index: u32) -> AddressFilter {
        AddressFilter::new(index, self.ip_version)
            .with_allow_private(self.allow_private)
            .with_allow_temporary(self.allow_temporary)
    }

    fn resolve_interface(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        cli.interface
            .clone()
            .or_else(|| toml.and_then(|t| t.monitor.interface.clone()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::INTERFACE,
                    "Pass INTERFACE or set monitor.interface in config file",
                )
            })
    }

    fn resolve_buffer_size(toml: Option<&TomlConfig>) -> Result<usize, ConfigError> {
        let size = toml
            .and_then(|t| t.monitor.buffer_size)
            .unwrap_or(defaults::BUFFER_SIZE);

        if size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(size)
    }

    fn resolve_url(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        ip_version: IpVersion,
    ) -> Result<Option<UrlTemplate>, ConfigError> {
        let Some(text) = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.http.url.as_deref()))
        else {
            return Ok(None);
        };

        let template = UrlTemplate::new(text);
        let samples = [
            (ip_version.includes_v4(), SAMPLE_V4),
            (ip_version.includes_v6(), SAMPLE_V6),
        ];
        for (_, sample) in samples.iter().filter(|(enabled, _)| *enabled) {
            template
                .validate(*sample)
                .map_err(|e| ConfigError::InvalidUrl {
                    url: text.to_string(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Some(template))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn resolve_duration(
    field: &'static str,
    seconds: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let seconds = seconds.unwrap_or(default);
    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}
