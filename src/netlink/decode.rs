//! Bounds-checked, single-pass walker over rtnetlink datagrams.
//!
//! [`decode`] turns one received datagram into a lazy sequence of
//! [`Record`]s. Every length the kernel reports is checked against the bytes
//! actually available before any field is read; a short or inconsistent
//! header ends the walk instead of reading past the buffer.

use std::iter::FusedIterator;

use super::wire::{
    self, ATTR_HEADER_LEN, HEADER_LEN, IFA_FLAGS, IFADDRMSG_LEN, NLMSG_DONE, NLMSG_ERROR,
    RTM_NEWADDR,
};

/// One typed attribute (`struct rtattr`) of an address message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute type tag (`IFA_*`).
    pub kind: u16,
    /// Raw payload, without the attribute header or trailing padding.
    pub payload: &'a [u8],
}

/// A decoded `RTM_NEWADDR` message: the `ifaddrmsg` header plus its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressMessage<'a> {
    /// Address family (`AF_INET` / `AF_INET6`).
    pub family: u8,
    /// Prefix length of the address.
    pub prefix_len: u8,
    /// Legacy 8-bit flags field.
    pub flags: u8,
    /// Address scope.
    pub scope: u8,
    /// Interface index the address belongs to.
    pub index: u32,
    attrs: &'a [u8],
}

impl<'a> AddressMessage<'a> {
    fn parse(payload: &'a [u8]) -> Option<Self> {
        if payload.len() < IFADDRMSG_LEN {
            return None;
        }

        Some(Self {
            family: payload[0],
            prefix_len: payload[1],
            flags: payload[2],
            scope: payload[3],
            index: wire::read_u32(payload, 4)?,
            attrs: payload.get(wire::align(IFADDRMSG_LEN)..).unwrap_or_default(),
        })
    }

    /// Returns a lazy iterator over the attributes, in wire order.
    #[must_use]
    pub const fn attributes(&self) -> Attributes<'a> {
        Attributes { buf: self.attrs }
    }

    /// Returns the first attribute of the given type.
    #[must_use]
    pub fn attribute(&self, kind: u16) -> Option<Attribute<'a>> {
        self.attributes().find(|attr| attr.kind == kind)
    }

    /// Returns the 32-bit `IFA_FLAGS` override, if the kernel sent one.
    #[must_use]
    pub fn explicit_flags(&self) -> Option<u32> {
        self.attribute(IFA_FLAGS)
            .and_then(|attr| wire::read_u32(attr.payload, 0))
    }

    /// Returns the flags that apply to this address.
    ///
    /// The `IFA_FLAGS` attribute supersedes the header field, which can only
    /// carry the low eight bits.
    #[must_use]
    pub fn effective_flags(&self) -> u32 {
        self.explicit_flags().unwrap_or_else(|| u32::from(self.flags))
    }
}

/// Iterator over the attributes of one [`AddressMessage`].
#[derive(Debug, Clone)]
pub struct Attributes<'a> {
    buf: &'a [u8],
}

impl<'a> Iterator for Attributes<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let buf = self.buf;
        let len = usize::from(wire::read_u16(buf, 0)?);
        let kind = wire::read_u16(buf, 2)?;

        if len < ATTR_HEADER_LEN || len > buf.len() {
            self.buf = &[];
            return None;
        }

        self.buf = buf.get(wire::align(len)..).unwrap_or_default();
        Some(Attribute {
            kind,
            payload: &buf[ATTR_HEADER_LEN..len],
        })
    }
}

impl FusedIterator for Attributes<'_> {}

/// One record of a datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    /// A new (or refreshed) address.
    NewAddress(AddressMessage<'a>),
    /// An error report; the code is the negated kernel value (a positive
    /// errno), and zero is an acknowledgement.
    Error(i32),
    /// End of a multipart dump.
    Done,
    /// Any other message type.
    Other(u16),
}

/// Lazy, finite, single-pass iterator over the records of one datagram.
///
/// The iterator is exhausted after [`Record::Done`] or after the first
/// malformed record.
#[derive(Debug, Clone)]
pub struct Messages<'a> {
    buf: &'a [u8],
}

/// Decodes the first `buf.len()` bytes of a datagram.
#[must_use]
pub const fn decode(buf: &[u8]) -> Messages<'_> {
    Messages { buf }
}

impl<'a> Messages<'a> {
    fn finish(&mut self) -> Option<Record<'a>> {
        self.buf = &[];
        None
    }

    fn record(kind: u16, payload: &'a [u8]) -> Option<Record<'a>> {
        match kind {
            NLMSG_DONE => Some(Record::Done),
            NLMSG_ERROR => wire::read_i32(payload, 0).map(|code| Record::Error(code.wrapping_neg())),
            RTM_NEWADDR => AddressMessage::parse(payload).map(Record::NewAddress),
            other => Some(Record::Other(other)),
        }
    }
}

impl<'a> Iterator for Messages<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let buf = self.buf;
        let Some(len) = wire::read_u32(buf, 0).and_then(|l| usize::try_from(l).ok()) else {
            return self.finish();
        };
        let Some(kind) = wire::read_u16(buf, 4) else {
            return self.finish();
        };

        if len < HEADER_LEN || len > buf.len() {
            return self.finish();
        }

        let Some(record) = Self::record(kind, &buf[HEADER_LEN..len]) else {
            return self.finish();
        };

        if record == Record::Done {
            self.buf = &[];
        } else {
            self.buf = buf.get(wire::align(len)..).unwrap_or_default();
        }
        Some(record)
    }
}

impl FusedIterator for Messages<'_> {}
