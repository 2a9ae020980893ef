//! Zone file rendering

use crate::record::{ZoneRecord, strip_trailing_dot};
use std::fmt::Write;

/// Default `$TTL` written into generated zone files
pub const DEFAULT_ZONE_TTL: &str = "3600";

/// Render records as zone text with `$ORIGIN` and `$TTL` headers.
///
/// A record with an empty TTL is written with `default_ttl`, otherwise the
/// line would have too few fields to be read back.
pub fn render_zone(origin: &str, default_ttl: &str, records: &[ZoneRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "$ORIGIN {}.", strip_trailing_dot(origin));
    let _ = writeln!(out, "$TTL {}", default_ttl);
    out.push('\n');

    for record in records {
        let ttl = if record.ttl.is_empty() {
            default_ttl
        } else {
            record.ttl.as_str()
        };
        let _ = writeln!(
            out,
            "{}\t{}\tIN\t{}\t{}",
            record.name, ttl, record.rtype, record.rdata
        );
    }

    out
}
