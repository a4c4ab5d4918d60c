//! Record filtering for selective monitoring.
//!
//! [`accept`] decides whether a decoded `RTM_NEWADDR` message carries an
//! address worth reporting. A message passes only if all of these hold:
//!
//! - its family is one the filter watches
//! - it belongs to the watched interface
//! - its scope is global or site
//! - its effective flags are not deprecated, and (IPv6 only) temporary only
//!   if allowed
//! - its address is outside the private ranges, unless those are allowed
//!
//! Both functions are pure: the same filter and message always give the same
//! answer.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::{AddressFilter, is_private_address};
use crate::netlink::wire::{
    AF_INET, AF_INET6, IFA_ADDRESS, IFA_F_DEPRECATED, IFA_F_TEMPORARY, RT_SCOPE_SITE,
    RT_SCOPE_UNIVERSE,
};
use crate::netlink::{AddressMessage, Attribute};

/// Returns true for scopes reachable beyond the local link.
#[must_use]
pub const fn is_routable_scope(scope: u8) -> bool {
    matches!(scope, RT_SCOPE_UNIVERSE | RT_SCOPE_SITE)
}

/// Returns the address attribute of `message` if the filter accepts it.
///
/// The returned attribute may still fail [`extract_address`] when its
/// payload has the wrong width for the family; the private-range check is
/// skipped in that case and the caller decides what to do with it.
#[must_use]
pub fn accept<'a>(filter: &AddressFilter, message: &AddressMessage<'a>) -> Option<Attribute<'a>> {
    if !filter.accepts_family(message.family)
        || message.index != filter.interface
        || !is_routable_scope(message.scope)
    {
        return None;
    }

    let flags = message.effective_flags();
    if flags & IFA_F_DEPRECATED != 0 {
        return None;
    }
    // On IPv4 the same bit marks a secondary address.
    if message.family == AF_INET6 && flags & IFA_F_TEMPORARY != 0 && !filter.allow_temporary {
        return None;
    }

    let attribute = message.attribute(IFA_ADDRESS)?;
    if !filter.allow_private
        && extract_address(message, &attribute).is_some_and(is_private_address)
    {
        return None;
    }

    Some(attribute)
}

/// Builds an address from an address attribute of `message`.
///
/// Returns `None` unless the payload is exactly 4 bytes for `AF_INET` or
/// 16 bytes for `AF_INET6`.
#[must_use]
pub fn extract_address(message: &AddressMessage<'_>, attribute: &Attribute<'_>) -> Option<IpAddr> {
    match message.family {
        AF_INET => {
            let octets: [u8; 4] = attribute.payload.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        AF_INET6 => {
            let octets: [u8; 16] = attribute.payload.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}
