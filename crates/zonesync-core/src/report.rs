// # Comparison Report
//
// Read-only view of how each zone file relates to the provider. Rows come
// straight from the differ; the `note` column tells a drifted record (same
// name and type on both sides) apart from one that is simply absent.
//
// ## File Format
//
// ```text
// domain,name,ttl,type,rdata,status,note
// example.com,@,3600,A,1.1.1.1,matching,
// example.com,www,300,CNAME,example.com,local-only,ttl/rdata differs from remote
// ```

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{info, warn};

use crate::diff::{DiffStatus, count_by_status, diff_records};
use crate::error::Result;
use crate::normalize::normalize_remote_all;
use crate::record::{RecordKey, ZoneRecord};
use crate::traits::DnsProvider;
use crate::zone::ZoneDirectory;

/// Fixed report header
pub const REPORT_HEADER: [&str; 7] = ["domain", "name", "ttl", "type", "rdata", "status", "note"];

/// One report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub domain: String,
    pub record: ZoneRecord,
    pub status: DiffStatus,
    pub note: String,
}

impl ReportRow {
    fn fields(&self) -> [&str; 7] {
        [
            self.domain.as_str(),
            self.record.name.as_str(),
            self.record.ttl.as_str(),
            self.record.rtype.as_str(),
            self.record.rdata.as_str(),
            self.status.as_str(),
            self.note.as_str(),
        ]
    }
}

/// Rows for every compared domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonReport {
    pub rows: Vec<ReportRow>,
    /// Domains that could not be compared, with the reason
    pub skipped: Vec<(String, String)>,
}

impl ComparisonReport {
    /// Render as CSV, header first
    pub fn to_csv(&self) -> String {
        let mut out = csv_line(&REPORT_HEADER);
        for row in &self.rows {
            out.push_str(&csv_line(&row.fields()));
        }
        out
    }

    /// Write the CSV rendering to `path`
    pub async fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_csv()).await?;
        info!("Wrote {} row(s) to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Rows with the given status
    pub fn with_status(&self, status: DiffStatus) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |row| row.status == status)
    }
}

/// Build report rows for one domain
pub fn compare_domain(domain: &str, local: &[ZoneRecord], remote: &[ZoneRecord]) -> Vec<ReportRow> {
    let local_keys: BTreeSet<RecordKey> = local.iter().map(ZoneRecord::key).collect();
    let remote_keys: BTreeSet<RecordKey> = remote.iter().map(ZoneRecord::key).collect();

    diff_records(local, remote)
        .into_iter()
        .map(|entry| {
            let key = entry.record.key();
            let note = match entry.status {
                DiffStatus::Matching => "",
                DiffStatus::LocalOnly if remote_keys.contains(&key) => "ttl/rdata differs from remote",
                DiffStatus::LocalOnly => "missing in remote",
                DiffStatus::RemoteOnly if local_keys.contains(&key) => "ttl/rdata differs from local",
                DiffStatus::RemoteOnly => "not declared locally",
            };
            ReportRow {
                domain: domain.to_string(),
                record: entry.record,
                status: entry.status,
                note: note.to_string(),
            }
        })
        .collect()
}

/// Read-only comparison of zone files against a provider
pub struct Comparer {
    provider: Box<dyn DnsProvider>,
}

impl Comparer {
    pub fn new(provider: Box<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    /// Compare every zone file in `zones`.
    ///
    /// A domain whose remote records cannot be fetched is skipped and listed
    /// in [`ComparisonReport::skipped`].
    pub async fn compare_all(&self, zones: &ZoneDirectory) -> Result<ComparisonReport> {
        let mut report = ComparisonReport::default();

        for file in zones.list().await? {
            let local = match zones.load(&file).await {
                Ok(records) => records,
                Err(e) => {
                    warn!("Skipping {}: {}", file.path.display(), e);
                    report.skipped.push((file.domain, e.to_string()));
                    continue;
                }
            };

            let remote = match self.provider.list_records(&file.domain).await {
                Ok(rows) => normalize_remote_all(&rows),
                Err(e) => {
                    warn!("Skipping {}: failed to fetch remote records: {}", file.domain, e);
                    report.skipped.push((file.domain, e.to_string()));
                    continue;
                }
            };

            let rows = compare_domain(&file.domain, &local, &remote);
            let (matching, local_only, remote_only) =
                count_by_status(rows.iter().map(|row| row.status));
            info!(
                "{}: {} matching, {} local-only, {} remote-only",
                file.domain, matching, local_only, remote_only
            );
            report.rows.extend(rows);
        }

        Ok(report)
    }
}

fn csv_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
