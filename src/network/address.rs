//! Address families, private ranges and the address filter configuration.

use std::fmt;
use std::net::IpAddr;

use crate::netlink::wire::{AF_INET, AF_INET6, AF_UNSPEC, RTNLGRP_IPV4_IFADDR, RTNLGRP_IPV6_IFADDR};

/// Widest textual form of any address (`INET6_ADDRSTRLEN - 1`).
pub const MAX_ADDRESS_TEXT_LEN: usize = 45;

/// IP version(s) to monitor.
///
/// There is no "neither" variant: a filter always watches at least one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    /// Monitor IPv4 addresses only.
    V4,
    /// Monitor IPv6 addresses only.
    V6,
    /// Monitor both IPv4 and IPv6 addresses.
    Both,
}

impl IpVersion {
    /// Builds a version from independent per-family switches.
    ///
    /// Choosing neither family selects both.
    #[must_use]
    pub const fn from_flags(ipv4: bool, ipv6: bool) -> Self {
        match (ipv4, ipv6) {
            (true, false) => Self::V4,
            (false, true) => Self::V6,
            _ => Self::Both,
        }
    }

    /// Returns true if this version includes IPv4.
    #[must_use]
    pub const fn includes_v4(self) -> bool {
        matches!(self, Self::V4 | Self::Both)
    }

    /// Returns true if this version includes IPv6.
    #[must_use]
    pub const fn includes_v6(self) -> bool {
        matches!(self, Self::V6 | Self::Both)
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
            Self::Both => write!(f, "IPv4+IPv6"),
        }
    }
}

/// Returns true for RFC 1918 IPv4 ranges and IPv6 unique-local addresses.
///
/// Loopback and link-local addresses are not considered private here; they
/// are rejected by scope instead.
#[must_use]
pub const fn is_private_address(address: IpAddr) -> bool {
    match address {
        IpAddr::V4(v4) => v4.is_private(),
        // fc00::/7
        IpAddr::V6(v6) => v6.segments()[0] & 0xfe00 == 0xfc00,
    }
}

/// Which addresses of which interface are of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFilter {
    /// Kernel index of the watched interface.
    pub interface: u32,
    /// Families to watch.
    pub version: IpVersion,
    /// Accept RFC 1918 / unique-local addresses.
    pub allow_private: bool,
    /// Accept temporary (privacy extension) addresses.
    pub allow_temporary: bool,
}

impl AddressFilter {
    /// Creates a filter that rejects private and temporary addresses.
    #[must_use]
    pub const fn new(interface: u32, version: IpVersion) -> Self {
        Self {
            interface,
            version,
            allow_private: false,
            allow_temporary: false,
        }
    }

    /// Sets whether private addresses are accepted.
    #[must_use]
    pub const fn with_allow_private(mut self, allow: bool) -> Self {
        self.allow_private = allow;
        self
    }

    /// Sets whether temporary addresses are accepted.
    #[must_use]
    pub const fn with_allow_temporary(mut self, allow: bool) -> Self {
        self.allow_temporary = allow;
        self
    }

    /// Returns true if a record of the given kernel address family is wanted.
    #[must_use]
    pub const fn accepts_family(&self, family: u8) -> bool {
        match family {
            AF_INET => self.version.includes_v4(),
            AF_INET6 => self.version.includes_v6(),
            _ => false,
        }
    }

    /// Address family to put in a dump request.
    #[must_use]
    pub const fn dump_family(&self) -> u8 {
        match self.version {
            IpVersion::V4 => AF_INET,
            IpVersion::V6 => AF_INET6,
            IpVersion::Both => AF_UNSPEC,
        }
    }

    /// Notification groups to subscribe to.
    #[must_use]
    pub fn groups(&self) -> Vec<u32> {
        let mut groups = Vec::with_capacity(2);
        if self.version.includes_v4() {
            groups.push(RTNLGRP_IPV4_IFADDR);
        }
        if self.version.includes_v6() {
            groups.push(RTNLGRP_IPV6_IFADDR);
        }
        groups
    }
}
