//! Tests for validated configuration.

use std::time::Duration;

use crate::network::IpVersion;

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["ddns-netlink"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod required_fields {
    use super::*;

    #[test]
    fn missing_interface_returns_error() {
        let result = ValidatedConfig::from_raw(&cli(&[]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired {
                field: "interface",
                ..
            })
        ));
    }

    #[test]
    fn interface_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), None).unwrap();

        assert_eq!(config.interface, "eth0");
        assert!(config.url.is_none());
    }

    #[test]
    fn interface_from_toml() {
        let toml = toml("[monitor]\ninterface = \"wlan0\"\n");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.interface, "wlan0");
    }
}

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_interface_overrides_toml() {
        let toml = toml("[monitor]\ninterface = \"wlan0\"\n");
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml)).unwrap();

        assert_eq!(config.interface, "eth0");
    }

    #[test]
    fn cli_url_overrides_toml() {
        let toml = toml("[http]\nurl = \"https://toml.example/?ip=<ipaddr>\"\n");
        let config = ValidatedConfig::from_raw(
            &cli(&["eth0", "https://cli.example/?ip=<ipaddr>"]),
            Some(&toml),
        )
        .unwrap();

        assert_eq!(
            config.url.unwrap().as_str(),
            "https://cli.example/?ip=<ipaddr>"
        );
    }

    #[test]
    fn toml_url_used_when_cli_has_none() {
        let toml = toml("[http]\nurl = \"https://toml.example/?ip=<ipaddr>\"\n");
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml)).unwrap();

        assert_eq!(
            config.url.unwrap().as_str(),
            "https://toml.example/?ip=<ipaddr>"
        );
    }

    #[test]
    fn cli_timeouts_override_toml() {
        let toml = toml("[http]\nconnect_timeout = 3\ntimeout = 12\n");
        let config = ValidatedConfig::from_raw(
            &cli(&["--connect-timeout", "4", "--timeout", "20", "eth0"]),
            Some(&toml),
        )
        .unwrap();

        assert_eq!(config.connect_timeout, Duration::from_secs(4));
        assert_eq!(config.timeout, Duration::from_secs(20));
    }

    #[test]
    fn toml_timeouts_used_when_cli_has_none() {
        let toml = toml("[http]\nconnect_timeout = 3\ntimeout = 12\n");
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml)).unwrap();

        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(12));
    }
}

mod defaults {
    use super::*;

    #[test]
    fn built_in_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), None).unwrap();

        assert_eq!(config.ip_version, IpVersion::Both);
        assert!(!config.allow_private);
        assert!(!config.allow_temporary);
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.verbose);
    }

    #[test]
    fn buffer_size_from_toml() {
        let toml = toml("[monitor]\nbuffer_size = 4096\n");
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml)).unwrap();

        assert_eq!(config.buffer_size, 4096);
    }
}

mod families {
    use super::*;

    #[test]
    fn ipv4_only() {
        let config = ValidatedConfig::from_raw(&cli(&["-4", "eth0"]), None).unwrap();

        assert_eq!(config.ip_version, IpVersion::V4);
    }

    #[test]
    fn ipv6_only() {
        let config = ValidatedConfig::from_raw(&cli(&["-6", "eth0"]), None).unwrap();

        assert_eq!(config.ip_version, IpVersion::V6);
    }

    #[test]
    fn both_flags_enable_both() {
        let config = ValidatedConfig::from_raw(&cli(&["-4", "-6", "eth0"]), None).unwrap();

        assert_eq!(config.ip_version, IpVersion::Both);
    }

    #[test]
    fn cli_and_toml_families_combine() {
        let toml = toml("[monitor]\nipv6 = true\n");
        let config = ValidatedConfig::from_raw(&cli(&["-4", "eth0"]), Some(&toml)).unwrap();

        assert_eq!(config.ip_version, IpVersion::Both);
    }

    #[test]
    fn toml_family_alone() {
        let toml = toml("[monitor]\nipv4 = true\n");
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml)).unwrap();

        assert_eq!(config.ip_version, IpVersion::V4);
    }
}

mod boolean_flags {
    use super::*;

    #[test]
    fn cli_flags_enable() {
        let config = ValidatedConfig::from_raw(&cli(&["-p", "-t", "-v", "eth0"]), None).unwrap();

        assert!(config.allow_private);
        assert!(config.allow_temporary);
        assert!(config.verbose);
    }

    #[test]
    fn toml_true_cannot_be_disabled_by_cli() {
        let toml = toml("[monitor]\nallow_private = true\nallow_temporary = true\n");
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml)).unwrap();

        assert!(config.allow_private);
        assert!(config.allow_temporary);
    }
}

mod url_validation {
    use super::*;

    #[test]
    fn url_without_placeholder_is_accepted() {
        let config =
            ValidatedConfig::from_raw(&cli(&["eth0", "https://example.com/ping"]), None).unwrap();

        assert_eq!(config.url.unwrap().placeholders(), 0);
    }

    #[test]
    fn relative_url_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["eth0", "update?ip=<ipaddr>"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn placeholder_in_host_is_valid_for_v4() {
        let config =
            ValidatedConfig::from_raw(&cli(&["-4", "eth0", "http://<ipaddr>:8080/"]), None)
                .unwrap();

        assert_eq!(config.url.unwrap().placeholders(), 1);
    }

    #[test]
    fn placeholder_in_host_is_invalid_for_v6() {
        let result = ValidatedConfig::from_raw(&cli(&["-6", "eth0", "http://<ipaddr>:8080/"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn error_names_the_template() {
        let err = ValidatedConfig::from_raw(&cli(&["eth0", "not a url <ipaddr>"]), None)
            .unwrap_err();

        assert!(err.to_string().contains("not a url <ipaddr>"));
    }
}

mod zero_values {
    use super::*;

    #[test]
    fn zero_connect_timeout_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--connect-timeout", "0", "eth0"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "connect_timeout",
                ..
            })
        ));
    }

    #[test]
    fn zero_timeout_from_toml_is_rejected() {
        let toml = toml("[http]\ntimeout = 0\n");
        let result = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "timeout",
                ..
            })
        ));
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let toml = toml("[monitor]\nbuffer_size = 0\n");
        let result = ValidatedConfig::from_raw(&cli(&["eth0"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidBufferSize)));
    }
}

mod address_filter {
    use super::*;

    #[test]
    fn filter_carries_settings_and_index() {
        let config = ValidatedConfig::from_raw(&cli(&["-6", "-p", "eth0"]), None).unwrap();

        let filter = config.filter(7);

        assert_eq!(filter.interface, 7);
        assert_eq!(filter.version, IpVersion::V6);
        assert!(filter.allow_private);
        assert!(!filter.allow_temporary);
    }
}

mod config_load {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn load_reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [monitor]
            interface = "eth1"
            ipv4 = true

            [http]
            url = "https://example.com/?ip=<ipaddr>"
        "#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = ValidatedConfig::load(&cli(&["-c", path])).unwrap();

        assert_eq!(config.interface, "eth1");
        assert_eq!(config.ip_version, IpVersion::V4);
        assert!(config.url.is_some());
    }

    #[test]
    fn load_without_config_file_uses_cli() {
        let config = ValidatedConfig::load(&cli(&["eth0"])).unwrap();

        assert_eq!(config.interface, "eth0");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let result = ValidatedConfig::load(&cli(&["-c", "/nonexistent/ddns-netlink.toml", "eth0"]));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}

mod write_config {
    use tempfile::tempdir;

    use super::*;
    use crate::config::write_default_config;

    #[test]
    fn written_template_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ddns-netlink.toml");

        write_default_config(&path).unwrap();
        let toml = TomlConfig::load(&path).unwrap();

        assert!(toml.monitor.interface.is_none());
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("ddns-netlink.toml");

        let result = write_default_config(&path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod display_impl {
    use super::*;

    #[test]
    fn display_shows_print_mode_without_url() {
        let config = ValidatedConfig::from_raw(&cli(&["eth0"]), None).unwrap();
        let text = config.to_string();

        assert!(text.contains("interface: eth0"));
        assert!(text.contains("none (print)"));
        assert!(text.contains("IPv4+IPv6"));
    }

    #[test]
    fn display_shows_url_template() {
        let config =
            ValidatedConfig::from_raw(&cli(&["eth0", "https://example.com/?ip=<ipaddr>"]), None)
                .unwrap();

        assert!(config.to_string().contains("https://example.com/?ip=<ipaddr>"));
    }
}
