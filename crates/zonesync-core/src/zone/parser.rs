//! Zone file parser
//!
//! Parsing is deliberately permissive: any line that does not look like a
//! `name ttl IN type rdata...` record is dropped without an error, so that
//! hand-edited zone files with unsupported syntax still load.

use crate::record::{APEX, ZoneRecord, strip_trailing_dot};

const ORIGIN_DIRECTIVE: &str = "$ORIGIN";
const TTL_DIRECTIVE: &str = "$TTL";
const CLASS_IN: &str = "IN";
const COMMENT: char = ';';

/// Parse zone text into records, in line order.
///
/// `origin` is used for relative-name resolution until a `$ORIGIN` line
/// replaces it. It may be given with or without a trailing dot.
pub fn parse_zone(text: &str, origin: &str) -> Vec<ZoneRecord> {
    let mut origin = strip_trailing_dot(origin).to_string();
    let mut records = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }

        if line.starts_with(ORIGIN_DIRECTIVE) {
            if let Some(value) = line.split_whitespace().nth(1) {
                origin = strip_trailing_dot(value).to_string();
            }
            continue;
        }

        if line.starts_with(TTL_DIRECTIVE) {
            continue;
        }

        if let Some(record) = parse_record_line(line, &origin) {
            records.push(record);
        }
    }

    records
}

/// Parse a single record line, `None` if it is malformed
fn parse_record_line(line: &str, origin: &str) -> Option<ZoneRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 || !tokens[2].eq_ignore_ascii_case(CLASS_IN) {
        return None;
    }

    let rdata = tokens[4..].join(" ");
    Some(ZoneRecord {
        name: resolve_name(tokens[0], origin),
        ttl: tokens[1].to_string(),
        rtype: tokens[3].to_string(),
        rdata: strip_trailing_dot(&rdata).to_string(),
    })
}

/// Rewrite an owner name relative to `origin`.
///
/// Only fully-qualified names are rewritten; relative labels are already in
/// canonical form. The origin is matched ASCII case-insensitively and the
/// remaining labels keep their spelling.
pub fn resolve_name(name: &str, origin: &str) -> String {
    if name == APEX {
        return APEX.to_string();
    }

    let Some(fqdn) = name.strip_suffix('.') else {
        return name.to_string();
    };

    if fqdn.eq_ignore_ascii_case(origin) {
        return APEX.to_string();
    }

    if origin.is_empty() || fqdn.len() <= origin.len() + 1 {
        return fqdn.to_string();
    }

    // ASCII case folding keeps byte offsets, so the split point is shared
    let split = fqdn.len() - origin.len();
    match (fqdn.get(..split), fqdn.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(origin) => {
            match head.strip_suffix('.') {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => fqdn.to_string(),
            }
        }
        _ => fqdn.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqdn_subdomain_becomes_relative_label() {
        let records = parse_zone("www.example.com. 3600 IN A 1.2.3.4", "example.com");
        assert_eq!(records, vec![ZoneRecord::new("www", "3600", "A", "1.2.3.4")]);
    }

    #[test]
    fn fqdn_origin_becomes_apex() {
        let records = parse_zone("example.com. 3600 IN A 1.2.3.4", "example.com");
        assert_eq!(records[0].name, "@");
    }

    #[test]
    fn foreign_fqdn_keeps_bare_name() {
        let records = parse_zone("www.other.org. 60 IN A 1.2.3.4", "example.com");
        assert_eq!(records[0].name, "www.other.org");
    }

    #[test]
    fn suffix_match_requires_label_boundary() {
        assert_eq!(resolve_name("badexample.com.", "example.com"), "badexample.com");
        assert_eq!(resolve_name("a.b.example.com.", "example.com"), "a.b");
    }

    #[test]
    fn origin_match_ignores_case() {
        let records = parse_zone(
            "WWW.EXAMPLE.COM. 300 IN A 1.2.3.4\nExample.Com. 300 IN A 1.2.3.5",
            "example.com",
        );
        assert_eq!(records[0].name, "WWW");
        assert_eq!(records[1].name, "@");
        assert_eq!(resolve_name("mail.example.com.", "EXAMPLE.COM"), "mail");
        assert_eq!(resolve_name("BADEXAMPLE.COM.", "example.com"), "BADEXAMPLE.COM");
    }

    #[test]
    fn relative_names_pass_through() {
        let records = parse_zone("mail 300 IN MX 10 mx.example.com.", "example.com");
        assert_eq!(records[0].name, "mail");
        assert_eq!(records[0].rdata, "10 mx.example.com");
    }

    #[test]
    fn origin_directive_changes_resolution() {
        let text = "\
$ORIGIN example.net.
$TTL 3600
www.example.net. 300 IN A 10.0.0.1
";
        let records = parse_zone(text, "example.com");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "www");
    }

    #[test]
    fn comments_blank_and_malformed_lines_are_skipped() {
        let text = "\
; a comment

@ 3600 IN A 1.1.1.1
www 300 CH A 2.2.2.2
short 300 IN A
@ 3600 in TXT \"v=spf1 -all\"
";
        let records = parse_zone(text, "example.com");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].rtype, "TXT");
        assert_eq!(records[1].rdata, "\"v=spf1 -all\"");
    }

    #[test]
    fn rdata_whitespace_is_collapsed() {
        let records = parse_zone("_sip._tcp 300 IN SRV 10   5\t5060  sip.example.com.", "example.com");
        assert_eq!(records[0].rdata, "10 5 5060 sip.example.com");
    }

    #[test]
    fn duplicates_are_preserved_in_order() {
        let text = "@ 300 IN A 1.1.1.1\n@ 300 IN A 2.2.2.2\n";
        let records = parse_zone(text, "example.com");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rdata, "1.1.1.1");
        assert_eq!(records[1].rdata, "2.2.2.2");
    }

    #[test]
    fn fallback_origin_may_have_trailing_dot() {
        let records = parse_zone("example.com. 60 IN A 1.2.3.4", "example.com.");
        assert_eq!(records[0].name, "@");
    }
}
