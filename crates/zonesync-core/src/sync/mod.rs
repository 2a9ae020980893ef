//! Zone synchronizer
//!
//! The Synchronizer is responsible for:
//! - Ensuring every local domain exists at the provider
//! - Adding records declared locally but missing remotely
//! - Updating records whose TTL or rdata drifted
//! - Reporting (and, only when enabled, deleting) records that exist remotely only
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   zone files   ┌──────────────┐   plan   ┌─────────────┐
//! │ ZoneDirectory│──────────────▶ │ Synchronizer │────────▶ │ DnsProvider │
//! └──────────────┘                └──────────────┘          └─────────────┘
//!                                        │
//!                                        ▼
//!                                  RunSummary
//! ```
//!
//! 1. Fetch the remote DNS domain list once
//! 2. For each zone file (sorted by file name): create the domain if needed
//! 3. Fetch remote rows, plan by `(name, type)`
//! 4. Apply adds, then updates, then deletions (policy permitting)
//!
//! Every call is awaited before the next is issued. Nothing is retried: a
//! failed record operation is recorded in the summary and the run moves on,
//! a failed domain fetch skips only that domain.

pub mod plan;

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::config::SyncOptions;
use crate::error::Result;
use crate::record::ZoneRecord;
use crate::traits::DnsProvider;
use crate::zone::{ZoneDirectory, ZoneFile};

pub use plan::{PlannedDeletion, PlannedUpdate, SyncPlan, plan_domain, remote_map};

/// One mutating operation for a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create the DNS domain at the provider
    CreateDomain,
    /// Add a record
    Add { record: ZoneRecord },
    /// Replace TTL and rdata of an existing row
    Update { row_id: String, record: ZoneRecord },
    /// Remove a row that is not declared locally
    Delete { row_id: String, record: ZoneRecord },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateDomain => f.write_str("create domain"),
            Operation::Add { record } => write!(f, "add {}", record),
            Operation::Update { row_id, record } => write!(f, "update row {} -> {}", row_id, record),
            Operation::Delete { row_id, record } => write!(f, "delete row {} ({})", row_id, record),
        }
    }
}

/// What happened to a planned operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Sent to the provider and accepted
    Applied,
    /// Not sent because the run is a dry run
    Planned,
    /// Not sent because deletions are disabled
    Suppressed,
    /// Sent and rejected, or the transport failed
    Failed(String),
}

/// A planned operation and its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub status: OperationStatus,
}

/// Result of reconciling one domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainReport {
    pub domain: String,
    pub operations: Vec<OperationOutcome>,
    /// Set when the domain could not be reconciled at all
    pub aborted: Option<String>,
}

impl DomainReport {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Self::default()
        }
    }

    /// Operations whose status matches `pred`
    fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&OperationOutcome) -> bool,
    {
        self.operations.iter().filter(|o| pred(o)).count()
    }

    /// Number of add operations that were applied
    pub fn added(&self) -> usize {
        self.count(|o| matches!(o.operation, Operation::Add { .. }) && o.status == OperationStatus::Applied)
    }

    /// Number of update operations that were applied
    pub fn updated(&self) -> usize {
        self.count(|o| {
            matches!(o.operation, Operation::Update { .. }) && o.status == OperationStatus::Applied
        })
    }

    /// Number of failed operations
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o.status, OperationStatus::Failed(_)))
    }

    /// Deletion candidates, whether or not they were sent
    pub fn deletion_candidates(&self) -> Vec<&ZoneRecord> {
        self.operations
            .iter()
            .filter_map(|o| match &o.operation {
                Operation::Delete { record, .. } => Some(record),
                _ => None,
            })
            .collect()
    }

    /// True if the domain was created during this run
    pub fn created(&self) -> bool {
        self.operations
            .iter()
            .any(|o| o.operation == Operation::CreateDomain && o.status == OperationStatus::Applied)
    }
}

/// Result of one synchronizer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub domains: Vec<DomainReport>,
}

impl RunSummary {
    /// Total failed operations plus aborted domains
    pub fn failures(&self) -> usize {
        self.domains
            .iter()
            .map(|d| d.failed() + usize::from(d.aborted.is_some()))
            .sum()
    }

    /// True if every domain was reconciled without failures
    pub fn is_clean(&self) -> bool {
        self.failures() == 0
    }
}

/// Zone synchronizer
///
/// Drives remote state towards the zone files using four mutating
/// operations: create domain, add record, update record, delete record.
/// Deletions are only sent when [`SyncOptions::deletion_enabled`] is set.
pub struct Synchronizer {
    /// DNS provider to reconcile against
    provider: Box<dyn DnsProvider>,

    /// Deletion and dry-run policy
    options: SyncOptions,
}

impl Synchronizer {
    /// Create a new synchronizer
    pub fn new(provider: Box<dyn DnsProvider>, options: SyncOptions) -> Self {
        Self { provider, options }
    }

    /// Policy in effect
    pub fn options(&self) -> SyncOptions {
        self.options
    }

    /// Reconcile every zone file in `zones`.
    ///
    /// When `only` is non-empty, zone files for other domains are skipped.
    pub async fn run(&self, zones: &ZoneDirectory, only: &[String]) -> Result<RunSummary> {
        let files: Vec<ZoneFile> = zones
            .list()
            .await?
            .into_iter()
            .filter(|file| only.is_empty() || only.contains(&file.domain))
            .collect();

        let remote_domains = self.remote_domain_names().await?;
        info!(
            "Synchronizing {} zone(s) with {} [mode: {}, deletions: {}]",
            files.len(),
            self.provider.provider_name(),
            if self.options.dry_run { "DRY-RUN" } else { "LIVE" },
            if self.options.deletion_enabled { "enabled" } else { "disabled" }
        );

        let mut summary = RunSummary::default();
        for file in &files {
            let report = match zones.load(file).await {
                Ok(records) => {
                    self.sync_domain(&file.domain, &records, remote_domains.contains(&file.domain))
                        .await
                }
                Err(e) => {
                    error!("Failed to read zone file {}: {}", file.path.display(), e);
                    DomainReport {
                        aborted: Some(e.to_string()),
                        ..DomainReport::new(&file.domain)
                    }
                }
            };
            summary.domains.push(report);
        }

        Ok(summary)
    }

    async fn remote_domain_names(&self) -> Result<BTreeSet<String>> {
        let domains = self.provider.list_dns_domains().await?;
        debug!("Provider reports {} DNS domain(s)", domains.len());
        Ok(domains.into_iter().map(|d| d.name).collect())
    }

    /// Reconcile one domain
    ///
    /// `exists_remotely` comes from the domain list fetched at the start of
    /// the run.
    pub async fn sync_domain(
        &self,
        domain: &str,
        local: &[ZoneRecord],
        exists_remotely: bool,
    ) -> DomainReport {
        let mut report = DomainReport::new(domain);

        if !exists_remotely {
            let status = self.apply(domain, &Operation::CreateDomain).await;
            let failed = matches!(status, OperationStatus::Failed(_));
            report.operations.push(OperationOutcome {
                operation: Operation::CreateDomain,
                status,
            });
            if failed {
                report.aborted = Some("domain could not be created".to_string());
                return report;
            }
        }

        // A domain that only exists in the plan has no rows to fetch
        let remote = if !exists_remotely && self.options.dry_run {
            Vec::new()
        } else {
            match self.provider.list_records(domain).await {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Skipping {}: failed to fetch remote records: {}", domain, e);
                    report.aborted = Some(e.to_string());
                    return report;
                }
            }
        };

        let plan = plan_domain(local, &remote);
        debug!(
            "{}: {} add(s), {} update(s), {} deletion candidate(s)",
            domain,
            plan.adds.len(),
            plan.updates.len(),
            plan.deletions.len()
        );

        let operations = plan
            .adds
            .into_iter()
            .map(|record| Operation::Add { record })
            .chain(plan.updates.into_iter().map(|u| Operation::Update {
                row_id: u.row_id,
                record: u.record,
            }))
            .chain(plan.deletions.into_iter().map(|d| Operation::Delete {
                row_id: d.row_id,
                record: d.record,
            }));

        for operation in operations {
            let status = self.apply(domain, &operation).await;
            report.operations.push(OperationOutcome { operation, status });
        }

        info!(
            "{}: {} added, {} updated, {} failed, {} deletion candidate(s)",
            domain,
            report.added(),
            report.updated(),
            report.failed(),
            report.deletion_candidates().len()
        );
        report
    }

    /// Send one operation, honouring dry-run and deletion policy
    async fn apply(&self, domain: &str, operation: &Operation) -> OperationStatus {
        if let Operation::Delete { .. } = operation
            && !self.options.deletion_enabled
        {
            info!("{}: would {} (deletions disabled)", domain, operation);
            return OperationStatus::Suppressed;
        }

        if self.options.dry_run {
            info!("[DRY-RUN] {}: would {}", domain, operation);
            return OperationStatus::Planned;
        }

        let result = match operation {
            Operation::CreateDomain => self.provider.create_domain(domain).await,
            Operation::Add { record } => self.provider.add_record(domain, record).await,
            Operation::Update { row_id, record } => {
                self.provider.update_record(domain, row_id, record).await
            }
            Operation::Delete { row_id, .. } => self.provider.delete_record(domain, row_id).await,
        };

        match result {
            Ok(()) => {
                info!("{}: {}", domain, operation);
                OperationStatus::Applied
            }
            Err(e) => {
                error!("{}: failed to {}: {}", domain, operation, e);
                OperationStatus::Failed(e.to_string())
            }
        }
    }
}
