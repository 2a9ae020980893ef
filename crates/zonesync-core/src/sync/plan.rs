//! Key-based change planning for one domain
//!
//! Unlike [`crate::diff`], planning compares by `(name, type)`: a record
//! whose TTL or rdata changed becomes a single update targeting the existing
//! row.

use std::collections::BTreeMap;

use crate::normalize::normalize_remote;
use crate::record::{RecordKey, RecordValue, ZoneRecord, record_map};
use crate::remote::RemoteRecord;

/// A remote row reduced to what planning needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub row_id: String,
    pub value: RecordValue,
}

/// An update of an existing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub row_id: String,
    /// Desired record, carrying the local TTL and rdata
    pub record: ZoneRecord,
    /// What the provider currently has
    pub previous: RecordValue,
}

/// A row present only remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDeletion {
    pub row_id: String,
    pub record: ZoneRecord,
}

/// Changes needed to make one domain match its zone file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub adds: Vec<ZoneRecord>,
    pub updates: Vec<PlannedUpdate>,
    pub deletions: Vec<PlannedDeletion>,
}

impl SyncPlan {
    /// True when no add or update is needed
    pub fn is_converged(&self) -> bool {
        self.adds.is_empty() && self.updates.is_empty()
    }
}

/// Index remote rows by `(name, type)`; later rows overwrite earlier ones
pub fn remote_map(rows: &[RemoteRecord]) -> BTreeMap<RecordKey, RemoteEntry> {
    rows.iter()
        .map(|row| {
            let record = normalize_remote(row);
            (
                record.key(),
                RemoteEntry {
                    row_id: row.row_id.clone(),
                    value: record.value(),
                },
            )
        })
        .collect()
}

/// Plan adds, updates and deletion candidates for one domain
pub fn plan_domain(local: &[ZoneRecord], remote: &[RemoteRecord]) -> SyncPlan {
    let desired = record_map(local);
    let actual = remote_map(remote);
    let mut plan = SyncPlan::default();

    for (key, value) in &desired {
        let record = ZoneRecord {
            name: key.name.clone(),
            ttl: value.ttl.clone(),
            rtype: key.rtype.clone(),
            rdata: value.rdata.clone(),
        };
        match actual.get(key) {
            None => plan.adds.push(record),
            Some(entry) if entry.value != *value => plan.updates.push(PlannedUpdate {
                row_id: entry.row_id.clone(),
                record,
                previous: entry.value.clone(),
            }),
            Some(_) => {}
        }
    }

    for (key, entry) in &actual {
        if !desired.contains_key(key) {
            plan.deletions.push(PlannedDeletion {
                row_id: entry.row_id.clone(),
                record: ZoneRecord {
                    name: key.name.clone(),
                    ttl: entry.value.ttl.clone(),
                    rtype: key.rtype.clone(),
                    rdata: entry.value.rdata.clone(),
                },
            });
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, ttl: &str, rdtype: &str, rdata: &str) -> RemoteRecord {
        RemoteRecord {
            row_id: id.to_string(),
            name: name.to_string(),
            ttl: ttl.to_string(),
            rdtype: rdtype.to_string(),
            rdata: rdata.to_string(),
        }
    }

    #[test]
    fn missing_key_is_added() {
        let local = vec![ZoneRecord::new("@", "3600", "A", "1.1.1.1")];
        let plan = plan_domain(&local, &[]);

        assert_eq!(plan.adds, local);
        assert!(plan.updates.is_empty());
        assert!(plan.deletions.is_empty());
    }

    #[test]
    fn changed_ttl_is_one_update_on_existing_row() {
        let local = vec![ZoneRecord::new("www", "300", "CNAME", "example.com")];
        let remote = vec![row("42", "www", "600", "CNAME", "example.com.")];

        let plan = plan_domain(&local, &remote);

        assert!(plan.adds.is_empty());
        assert!(plan.deletions.is_empty());
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].row_id, "42");
        assert_eq!(plan.updates[0].record.ttl, "300");
        assert_eq!(plan.updates[0].previous.ttl, "600");
    }

    #[test]
    fn identical_records_need_nothing() {
        let local = vec![ZoneRecord::new("@", "3600", "A", "1.1.1.1")];
        let remote = vec![row("1", "", "3600", "A", "1.1.1.1")];

        let plan = plan_domain(&local, &remote);
        assert!(plan.is_converged());
        assert!(plan.deletions.is_empty());
    }

    #[test]
    fn remote_only_key_is_deletion_candidate() {
        let remote = vec![row("7", "old", "300", "A", "9.9.9.9")];
        let plan = plan_domain(&[], &remote);

        assert_eq!(plan.deletions.len(), 1);
        assert_eq!(plan.deletions[0].row_id, "7");
        assert_eq!(plan.deletions[0].record.name, "old");
    }

    #[test]
    fn later_local_duplicate_wins() {
        let local = vec![
            ZoneRecord::new("@", "300", "A", "1.1.1.1"),
            ZoneRecord::new("@", "300", "A", "2.2.2.2"),
        ];
        let remote = vec![row("1", "@", "300", "A", "2.2.2.2")];

        assert!(plan_domain(&local, &remote).is_converged());
    }

    #[test]
    fn later_wire_row_wins_for_map_shaped_payload() {
        let data: serde_json::Value = serde_json::from_str(
            r#"{"row":{"9":{"ID":"9","name":"","ttl":"300","rdtype":"A","rdata":"1.1.1.1"},
                       "10":{"ID":"10","name":"","ttl":"300","rdtype":"A","rdata":"2.2.2.2"}}}"#,
        )
        .unwrap();
        let rows: Vec<RemoteRecord> = crate::remote::collection_from_value(&data, "row");

        let map = remote_map(&rows);
        let entry = &map[&ZoneRecord::new("@", "300", "A", "").key()];
        assert_eq!(entry.row_id, "10");
        assert_eq!(entry.value.rdata, "2.2.2.2");
    }
}
