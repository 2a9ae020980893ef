//! Three-way record diff
//!
//! The diff works on whole-tuple identity: a record whose TTL or rdata
//! changed shows up once as [`DiffStatus::LocalOnly`] and once as
//! [`DiffStatus::RemoteOnly`]. Key-based change detection lives in the
//! synchronizer.

use crate::record::ZoneRecord;
use std::collections::BTreeSet;
use std::fmt;

/// Classification of one record tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiffStatus {
    /// Present locally and remotely
    Matching,
    /// Declared in the zone file, missing at the provider
    LocalOnly,
    /// Present at the provider, not declared in the zone file
    RemoteOnly,
}

impl DiffStatus {
    /// Label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Matching => "matching",
            DiffStatus::LocalOnly => "local-only",
            DiffStatus::RemoteOnly => "remote-only",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub record: ZoneRecord,
    pub status: DiffStatus,
}

/// Classify the union of `local` and `remote`.
///
/// Both inputs are deduplicated as sets. The result is sorted by record
/// (name, ttl, type, rdata) and every tuple appears exactly once.
pub fn diff_records(local: &[ZoneRecord], remote: &[ZoneRecord]) -> Vec<DiffEntry> {
    let local: BTreeSet<&ZoneRecord> = local.iter().collect();
    let remote: BTreeSet<&ZoneRecord> = remote.iter().collect();

    local
        .union(&remote)
        .map(|record| {
            let status = match (local.contains(record), remote.contains(record)) {
                (true, true) => DiffStatus::Matching,
                (true, false) => DiffStatus::LocalOnly,
                _ => DiffStatus::RemoteOnly,
            };
            DiffEntry {
                record: (*record).clone(),
                status,
            }
        })
        .collect()
}

/// Tally statuses in `(matching, local_only, remote_only)` order
pub fn count_by_status<I>(statuses: I) -> (usize, usize, usize)
where
    I: IntoIterator<Item = DiffStatus>,
{
    statuses
        .into_iter()
        .fold((0, 0, 0), |(m, l, r), status| match status {
            DiffStatus::Matching => (m + 1, l, r),
            DiffStatus::LocalOnly => (m, l + 1, r),
            DiffStatus::RemoteOnly => (m, l, r + 1),
        })
}
