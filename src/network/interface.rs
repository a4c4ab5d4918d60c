//! Interface name to kernel index resolution.

use std::ffi::CString;
use std::io;

use thiserror::Error;

/// Error type for interface resolution.
#[derive(Debug, Error)]
pub enum InterfaceError {
    /// The name contains an interior NUL byte.
    #[error("Interface name contains a NUL byte")]
    InvalidName,

    /// The kernel does not know the interface.
    #[error("{0}")]
    Lookup(#[source] io::Error),
}

/// Resolves an interface name such as `eth0` to its kernel index.
///
/// # Errors
///
/// Returns [`InterfaceError::Lookup`] with the OS error if no such interface
/// exists.
pub fn resolve_interface(name: &str) -> Result<u32, InterfaceError> {
    let c_name = CString::new(name).map_err(|_| InterfaceError::InvalidName)?;

    // Safety: libc wrapper, `c_name` is a valid NUL-terminated string.
    let index = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    if index == 0 {
        return Err(InterfaceError::Lookup(io::Error::last_os_error()));
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_resolves_to_nonzero_index() {
        let index = resolve_interface("lo").unwrap();
        assert!(index > 0);
    }

    #[test]
    fn unknown_interface_is_an_error() {
        let err = resolve_interface("no-such-if0").unwrap_err();
        assert!(matches!(err, InterfaceError::Lookup(_)));
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = resolve_interface("eth\0").unwrap_err();
        assert!(matches!(err, InterfaceError::InvalidName));
    }
}
