//! A fully-qualified DNS name, normalized to end in a dot.
//!
//! Adapted from `safe-dns::DnsName`, but without that type's strict
//! RFC 1035 label grammar (letter-first labels, no underscores). Record
//! domains in this workspace come from an operator-supplied instance
//! metadata snapshot, not from parsed wire-format queries, and commonly
//! contain labels like `z1` or `my_network` that the wire-name grammar
//! would reject outright.
#![forbid(unsafe_code)]

use std::fmt;

/// A DNS name known to end in a single trailing dot.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fqdn(String);

impl Fqdn {
    /// Appends a trailing dot if `value` doesn't already end with one.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self {
        let value = value.as_ref();
        if value.ends_with('.') {
            Self(value.to_string())
        } else {
            Self(format!("{value}."))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its trailing dot.
    #[must_use]
    pub fn without_trailing_dot(&self) -> &str {
        &self.0[..self.0.len() - 1]
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fqdn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
