//! [![unsafe forbidden](https://gitlab.com/leonhard-llc/ops/-/raw/main/unsafe-forbidden.svg)](https://github.com/rust-secure-code/safety-dance/)
//!
//! # record-set
//!
//! Resolves fleet instance names to IP addresses from a columnar JSON
//! instance-metadata snapshot. Handles both plain FQDNs and the `q-`
//! structured query-name grammar (equality predicates encoded in the
//! leftmost label).
//!
//! ## Use Cases
//! - Answer internal service-discovery queries without a round trip to an
//!   upstream recursor.
//! - Let queries filter by availability zone, instance index, or group
//!   without a separate lookup service.
//!
//! ## Features
//! - `forbid(unsafe_code)`
//! - Immutable once built: rebuild and swap in a new `RecordSet` rather than
//!   mutating one in place.
//! - Tolerant JSON decoder: rows with schema drift are logged and dropped
//!   rather than failing the whole snapshot.
//!
//! ## Example
//! ```
//! use record_set::RecordSet;
//!
//! let json = serde_json::json!({
//!     "record_keys": ["id", "instance_group", "network", "deployment", "ip", "domain"],
//!     "record_infos": [["i1", "g", "n", "d", "10.0.0.1", "bosh"]],
//! });
//! let record_set = RecordSet::from_json(json.to_string().as_bytes()).unwrap();
//! assert_eq!(vec!["10.0.0.1"], record_set.resolve("i1.g.n.d.bosh.").unwrap());
//! ```
#![forbid(unsafe_code)]

mod criteria;
mod decode;
mod ordinals;
mod record;

pub use criteria::{Criteria, CriteriaError};
pub use decode::DecodeError;
pub use ordinals::Ordinals;
pub use record::Record;

use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolveError {
    /// A `q-` name with no `.` separator after its encoded segment.
    MalformedQueryName,
    Criteria(CriteriaError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::MalformedQueryName => write!(f, "domain is malformed"),
            ResolveError::Criteria(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::MalformedQueryName => None,
            ResolveError::Criteria(e) => Some(e),
        }
    }
}

impl From<CriteriaError> for ResolveError {
    fn from(e: CriteriaError) -> Self {
        ResolveError::Criteria(e)
    }
}

/// An immutable set of instance records, built once from a snapshot and
/// queried by [`Self::resolve`]. Replacing the fleet's records means
/// building a new `RecordSet` and publishing it; there is no in-place
/// mutation.
pub struct RecordSet {
    domains: HashSet<String>,
    records: Vec<Record>,
    ordinals: Ordinals,
}

impl RecordSet {
    /// Decodes `bytes` as a `{record_keys, record_infos}` snapshot (see the
    /// `record-set` crate docs) and builds the record set.
    ///
    /// # Errors
    /// Returns [`DecodeError::Json`] only when the top-level JSON itself is
    /// malformed; individual bad rows are logged and skipped.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (domains, records) = decode::decode(bytes)?;
        let ordinals = Ordinals::build(&records);
        Ok(Self {
            domains: domains.into_iter().collect(),
            records,
            ordinals,
        })
    }

    #[must_use]
    pub fn domains(&self) -> &HashSet<String> {
        &self.domains
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Resolves `name` to the IP addresses of every matching record, in
    /// snapshot insertion order.
    ///
    /// An IPv4/IPv6 literal is returned as a single-element list,
    /// unconditionally. A `q-`-prefixed name is parsed as a structured
    /// query; anything else is matched as a plain FQDN. An unmatched name
    /// returns an empty list, not an error.
    ///
    /// # Errors
    /// Returns [`ResolveError::MalformedQueryName`] if a `q-` name has no
    /// `.` after its encoded segment, and [`ResolveError::Criteria`] if
    /// that segment doesn't parse.
    pub fn resolve(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        if name.parse::<IpAddr>().is_ok() {
            return Ok(vec![name.to_string()]);
        }

        if let Some(rest) = name.strip_prefix("q-") {
            let mut parts = rest.splitn(2, '.');
            let encoded = parts.next().unwrap_or("");
            let suffix = parts
                .next()
                .ok_or(ResolveError::MalformedQueryName)?
                .trim_end_matches('.');
            let criteria = criteria::parse(encoded)?;
            let ips = self
                .records
                .iter()
                .filter(|record| {
                    record.group_fqdn() == suffix && criteria.matches(record, &self.ordinals)
                })
                .map(|record| record.ip.clone())
                .collect();
            Ok(ips)
        } else {
            let ips = self
                .records
                .iter()
                .filter(|record| record.full_fqdn() == name)
                .map(|record| record.ip.clone())
                .collect();
            Ok(ips)
        }
    }
}
