//! Canonical zone record model
//!
//! A [`ZoneRecord`] is the one shape every other module agrees on. The parser
//! produces them from zone files, the normalizer produces them from provider
//! rows, and the differ/synchronizer only ever compare these values.
//!
//! Field order matters: the derived `Ord` sorts by name, then ttl, then type,
//! then rdata, which is the order diff output is presented in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name used for the zone apex
pub const APEX: &str = "@";

/// One DNS resource record in canonical form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Label relative to the zone, `@` for the apex
    pub name: String,
    /// TTL in seconds as a decimal string, may be empty
    pub ttl: String,
    /// Record type mnemonic, e.g. `A` or `MX`
    #[serde(rename = "type")]
    pub rtype: String,
    /// Type-specific payload without a trailing dot
    pub rdata: String,
}

impl ZoneRecord {
    /// Create a record; `rdata` loses any trailing dot
    pub fn new(
        name: impl Into<String>,
        ttl: impl Into<String>,
        rtype: impl Into<String>,
        rdata: impl AsRef<str>,
    ) -> Self {
        Self {
            name: name.into(),
            ttl: ttl.into(),
            rtype: rtype.into(),
            rdata: strip_trailing_dot(rdata.as_ref()).to_string(),
        }
    }

    /// The `(name, type)` identity of this record
    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            rtype: self.rtype.clone(),
        }
    }

    /// The `(ttl, rdata)` payload of this record
    pub fn value(&self) -> RecordValue {
        RecordValue {
            ttl: self.ttl.clone(),
            rdata: self.rdata.clone(),
        }
    }
}

impl fmt::Display for ZoneRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} IN {} {}", self.name, self.ttl, self.rtype, self.rdata)
    }
}

/// Identity of a record within one domain
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub name: String,
    pub rtype: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.rtype)
    }
}

/// Comparable payload of a record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordValue {
    pub ttl: String,
    pub rdata: String,
}

/// Fold a record sequence into a keyed map.
///
/// Later records overwrite earlier ones with the same `(name, type)`.
pub fn record_map<'a, I>(records: I) -> BTreeMap<RecordKey, RecordValue>
where
    I: IntoIterator<Item = &'a ZoneRecord>,
{
    records
        .into_iter()
        .map(|record| (record.key(), record.value()))
        .collect()
}

/// Strip a single trailing dot, if any
pub fn strip_trailing_dot(value: &str) -> &str {
    value.strip_suffix('.').unwrap_or(value)
}
