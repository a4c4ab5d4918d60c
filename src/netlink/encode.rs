//! rtnetlink message encoding.
//!
//! The daemon itself only ever sends one message, the address dump request.
//! [`AddressRecord`] and the record helpers produce the kernel's side of the
//! conversation so the decoder can be exercised without a live kernel.

use std::net::IpAddr;

use super::decode::AddressMessage;
use super::wire::{
    self, AF_INET, AF_INET6, ATTR_HEADER_LEN, HEADER_LEN, IFA_ADDRESS, IFA_FLAGS, IFADDRMSG_LEN,
    NLM_F_MATCH, NLM_F_REQUEST, NLM_F_ROOT, NLMSG_DONE, NLMSG_ERROR, RT_SCOPE_UNIVERSE,
    RTM_GETADDR, RTM_NEWADDR,
};

/// Fields of a `struct nlmsghdr` other than the length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Message type.
    pub kind: u16,
    /// `NLM_F_*` flags.
    pub flags: u16,
    /// Sequence number.
    pub seq: u32,
    /// Sending port id.
    pub pid: u32,
}

fn push_message(out: &mut Vec<u8>, header: Header, payload: &[u8]) {
    let len = HEADER_LEN + payload.len();
    // Payloads built here are a few hundred bytes at most.
    #[allow(clippy::cast_possible_truncation)]
    out.extend_from_slice(&(len as u32).to_ne_bytes());
    out.extend_from_slice(&header.kind.to_ne_bytes());
    out.extend_from_slice(&header.flags.to_ne_bytes());
    out.extend_from_slice(&header.seq.to_ne_bytes());
    out.extend_from_slice(&header.pid.to_ne_bytes());
    out.extend_from_slice(payload);
    out.resize(out.len() + (wire::align(len) - len), 0);
}

fn push_ifaddrmsg(out: &mut Vec<u8>, family: u8, prefix_len: u8, flags: u8, scope: u8, index: u32) {
    out.extend_from_slice(&[family, prefix_len, flags, scope]);
    out.extend_from_slice(&index.to_ne_bytes());
}

/// Builds an `RTM_GETADDR` dump request.
///
/// `family` restricts the dump to one address family (`AF_UNSPEC` for all).
/// The kernel ignores `index` for address dumps, but it is filled in anyway.
#[must_use]
pub fn dump_request(family: u8, index: u32, seq: u32, pid: u32) -> Vec<u8> {
    let mut payload = Vec::with_capacity(IFADDRMSG_LEN);
    push_ifaddrmsg(&mut payload, family, 0, 0, 0, index);

    let mut out = Vec::with_capacity(wire::align(HEADER_LEN + IFADDRMSG_LEN));
    push_message(
        &mut out,
        Header {
            kind: RTM_GETADDR,
            flags: NLM_F_REQUEST | NLM_F_ROOT | NLM_F_MATCH,
            seq,
            pid,
        },
        &payload,
    );
    out
}

/// Appends an `NLMSG_ERROR` record carrying the kernel-side (negative) code.
pub fn push_error(out: &mut Vec<u8>, kernel_code: i32) {
    let mut payload = kernel_code.to_ne_bytes().to_vec();
    // The kernel echoes the offending request header after the code.
    payload.extend_from_slice(&[0; HEADER_LEN]);
    push_message(
        out,
        Header {
            kind: NLMSG_ERROR,
            ..Header::default()
        },
        &payload,
    );
}

/// Appends an `NLMSG_DONE` record.
pub fn push_done(out: &mut Vec<u8>) {
    push_message(
        out,
        Header {
            kind: NLMSG_DONE,
            ..Header::default()
        },
        &0i32.to_ne_bytes(),
    );
}

/// Appends a record of an arbitrary type with an opaque payload.
pub fn push_other(out: &mut Vec<u8>, kind: u16, payload: &[u8]) {
    push_message(
        out,
        Header {
            kind,
            ..Header::default()
        },
        payload,
    );
}

/// An owned `RTM_NEWADDR` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    /// Address family.
    pub family: u8,
    /// Prefix length.
    pub prefix_len: u8,
    /// Legacy 8-bit flags field.
    pub flags: u8,
    /// Address scope.
    pub scope: u8,
    /// Interface index.
    pub index: u32,
    /// Attributes in wire order.
    pub attributes: Vec<(u16, Vec<u8>)>,
}

impl AddressRecord {
    /// Creates a global-scope record for `address` on interface `index`.
    #[must_use]
    pub fn for_address(address: IpAddr, prefix_len: u8, index: u32) -> Self {
        let (family, bytes) = match address {
            IpAddr::V4(v4) => (AF_INET, v4.octets().to_vec()),
            IpAddr::V6(v6) => (AF_INET6, v6.octets().to_vec()),
        };

        Self {
            family,
            prefix_len,
            flags: 0,
            scope: RT_SCOPE_UNIVERSE,
            index,
            attributes: vec![(IFA_ADDRESS, bytes)],
        }
    }

    /// Copies a decoded message into an owned record.
    #[must_use]
    pub fn from_message(message: &AddressMessage<'_>) -> Self {
        Self {
            family: message.family,
            prefix_len: message.prefix_len,
            flags: message.flags,
            scope: message.scope,
            index: message.index,
            attributes: message
                .attributes()
                .map(|attr| (attr.kind, attr.payload.to_vec()))
                .collect(),
        }
    }

    /// Sets the scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: u8) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the legacy header flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    /// Appends an `IFA_FLAGS` attribute.
    #[must_use]
    pub fn with_flags_attribute(self, flags: u32) -> Self {
        self.with_attribute(IFA_FLAGS, flags.to_ne_bytes().to_vec())
    }

    /// Appends an arbitrary attribute.
    #[must_use]
    pub fn with_attribute(mut self, kind: u16, payload: Vec<u8>) -> Self {
        self.attributes.push((kind, payload));
        self
    }

    /// Appends this record to `out` as one `RTM_NEWADDR` message.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let mut payload = Vec::with_capacity(IFADDRMSG_LEN);
        push_ifaddrmsg(
            &mut payload,
            self.family,
            self.prefix_len,
            self.flags,
            self.scope,
            self.index,
        );

        for (kind, data) in &self.attributes {
            let len = ATTR_HEADER_LEN + data.len();
            // rta_len is 16 bits on the wire; attributes built here are tiny.
            #[allow(clippy::cast_possible_truncation)]
            payload.extend_from_slice(&(len as u16).to_ne_bytes());
            payload.extend_from_slice(&kind.to_ne_bytes());
            payload.extend_from_slice(data);
            payload.resize(payload.len() + (wire::align(len) - len), 0);
        }

        push_message(
            out,
            Header {
                kind: RTM_NEWADDR,
                ..Header::default()
            },
            &payload,
        );
    }

    /// Encodes this record as a standalone datagram.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }
}
