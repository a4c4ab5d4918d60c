//! rtnetlink wire constants and framing helpers.
//!
//! Values mirror `<linux/netlink.h>`, `<linux/rtnetlink.h>` and
//! `<linux/if_addr.h>`. They are defined here rather than taken from `libc`
//! so the decoder and encoder build and test on every platform.

/// Size of `struct nlmsghdr`.
pub const HEADER_LEN: usize = 16;

/// Size of `struct ifaddrmsg`.
pub const IFADDRMSG_LEN: usize = 8;

/// Size of `struct rtattr`.
pub const ATTR_HEADER_LEN: usize = 4;

/// Alignment of messages and attributes.
pub const ALIGNTO: usize = 4;

// Message types.
pub const NLMSG_NOOP: u16 = 1;
pub const NLMSG_ERROR: u16 = 2;
pub const NLMSG_DONE: u16 = 3;
pub const RTM_NEWADDR: u16 = 20;
pub const RTM_DELADDR: u16 = 21;
pub const RTM_GETADDR: u16 = 22;

// Message flags.
pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_ROOT: u16 = 0x100;
pub const NLM_F_MATCH: u16 = 0x200;

// Address families.
pub const AF_UNSPEC: u8 = 0;
pub const AF_INET: u8 = 2;
pub const AF_INET6: u8 = 10;

// Multicast groups for address notifications.
pub const RTNLGRP_IPV4_IFADDR: u32 = 5;
pub const RTNLGRP_IPV6_IFADDR: u32 = 9;

// `ifaddrmsg` attribute types.
pub const IFA_ADDRESS: u16 = 1;
pub const IFA_LOCAL: u16 = 2;
pub const IFA_LABEL: u16 = 3;
pub const IFA_CACHEINFO: u16 = 6;
pub const IFA_FLAGS: u16 = 8;

// Address flags.
pub const IFA_F_TEMPORARY: u32 = 0x01;
pub const IFA_F_DEPRECATED: u32 = 0x20;
pub const IFA_F_PERMANENT: u32 = 0x80;

// Address scopes.
pub const RT_SCOPE_UNIVERSE: u8 = 0;
pub const RT_SCOPE_SITE: u8 = 200;
pub const RT_SCOPE_LINK: u8 = 253;
pub const RT_SCOPE_HOST: u8 = 254;

/// Rounds `len` up to the netlink alignment.
#[must_use]
pub const fn align(len: usize) -> usize {
    (len + ALIGNTO - 1) & !(ALIGNTO - 1)
}

pub(crate) fn read_u16(buf: &[u8], at: usize) -> Option<u16> {
    let bytes = buf.get(at..at.checked_add(2)?)?;
    Some(u16::from_ne_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u32(buf: &[u8], at: usize) -> Option<u32> {
    let bytes = buf.get(at..at.checked_add(4)?)?;
    Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn read_i32(buf: &[u8], at: usize) -> Option<i32> {
    read_u32(buf, at).map(|v| i32::from_ne_bytes(v.to_ne_bytes()))
}
