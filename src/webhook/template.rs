//! URL templates with an address placeholder.

use std::fmt::Write as _;
use std::net::IpAddr;

use thiserror::Error;

use crate::network::MAX_ADDRESS_TEXT_LEN;

/// Token replaced by the address in a URL template.
pub const PLACEHOLDER: &str = "<ipaddr>";

/// Error type for template substitution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The substituted URL does not fit the destination.
    #[error("URL needs {needed} bytes but only {capacity} are available")]
    OutOfSpace {
        /// Length of the substituted URL.
        needed: usize,
        /// Space available in the destination.
        capacity: usize,
    },
}

/// A URL with zero or more [`PLACEHOLDER`] tokens.
///
/// ```
/// use ddns_netlink::webhook::UrlTemplate;
///
/// let template = UrlTemplate::new("https://dyn.example.com/update?ip=<ipaddr>");
/// assert_eq!(template.placeholders(), 1);
/// assert_eq!(
///     template.render("192.0.2.1".parse().unwrap()),
///     "https://dyn.example.com/update?ip=192.0.2.1"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    text: String,
    placeholders: usize,
}

impl UrlTemplate {
    /// Creates a template from its text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let placeholders = text.matches(PLACEHOLDER).count();
        Self { text, placeholders }
    }

    /// The raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of placeholder occurrences.
    #[must_use]
    pub const fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// Space that fits the template rendered with any address.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.text.len() + self.placeholders * MAX_ADDRESS_TEXT_LEN
    }

    /// Length of the template rendered with an address text of `address_len`
    /// bytes.
    #[must_use]
    pub fn rendered_len(&self, address_len: usize) -> usize {
        self.text.len() - self.placeholders * PLACEHOLDER.len() + self.placeholders * address_len
    }

    /// Replaces every placeholder with `address` into `out`.
    ///
    /// `out` is cleared first. If the result would be longer than
    /// `capacity`, nothing is written and `out` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::OutOfSpace`] when the result does not fit.
    pub fn substitute(
        &self,
        address: IpAddr,
        out: &mut String,
        capacity: usize,
    ) -> Result<(), TemplateError> {
        let mut text = String::with_capacity(MAX_ADDRESS_TEXT_LEN);
        // Writing to a String cannot fail.
        let _ = write!(text, "{address}");

        let needed = self.rendered_len(text.len());
        if needed > capacity {
            return Err(TemplateError::OutOfSpace { needed, capacity });
        }

        out.clear();
        let mut rest = self.text.as_str();
        while let Some(at) = rest.find(PLACEHOLDER) {
            out.push_str(&rest[..at]);
            out.push_str(&text);
            rest = &rest[at + PLACEHOLDER.len()..];
        }
        out.push_str(rest);
        Ok(())
    }

    /// Renders the template into a fresh string.
    #[must_use]
    pub fn render(&self, address: IpAddr) -> String {
        let mut out = String::with_capacity(self.capacity());
        // Unbounded capacity cannot fail.
        let _ = self.substitute(address, &mut out, usize::MAX);
        out
    }

    /// Checks that the template yields a valid URL for `sample`.
    ///
    /// # Errors
    ///
    /// Returns the URL parse error.
    pub fn validate(&self, sample: IpAddr) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.render(sample))
    }
}

impl std::fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
