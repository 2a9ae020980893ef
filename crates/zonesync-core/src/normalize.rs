//! Provider rows to canonical records
//!
//! The normalizer is a pure reshaping step. It does not validate record
//! types or rdata syntax.

use crate::record::{APEX, ZoneRecord, strip_trailing_dot};
use crate::remote::RemoteRecord;

/// Convert one provider row into a canonical record
pub fn normalize_remote(row: &RemoteRecord) -> ZoneRecord {
    let name = if row.name.trim().is_empty() {
        APEX.to_string()
    } else {
        row.name.clone()
    };

    ZoneRecord {
        name,
        ttl: row.ttl.trim().to_string(),
        rtype: row.rdtype.clone(),
        rdata: strip_trailing_dot(&row.rdata).to_string(),
    }
}

/// Convert a sequence of provider rows, preserving order
pub fn normalize_remote_all(rows: &[RemoteRecord]) -> Vec<ZoneRecord> {
    rows.iter().map(normalize_remote).collect()
}
