// # DNS Provider Trait
//
// Defines the interface the reconciliation engine uses to read and mutate a
// remote DNS hosting account.
//
// ## Implementations
//
// - WEDOS WAPI: `zonesync-provider-wedos` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::DnsProvider;
//
// async fn show(provider: &dyn DnsProvider) -> zonesync_core::Result<()> {
//     for domain in provider.list_dns_domains().await? {
//         let rows = provider.list_records(&domain.name).await?;
//         println!("{}: {} record(s)", domain.name, rows.len());
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::ZoneRecord;
use crate::remote::{RemoteDomain, RemoteRecord};

/// Trait for DNS provider implementations
///
/// Each method is one request/response exchange with the provider. A
/// non-success status or a transport failure is returned as an error for
/// that call only; the caller decides whether to skip the record or the
/// whole domain.
///
/// Implementations must normalize list- and map-shaped collections before
/// returning (see [`crate::remote::collection_from_value`]).
///
/// ## Forbidden
///
/// - Retrying or backing off. A failed call is reported and the next run
///   converges.
/// - Deciding whether a change is needed. That is owned by the
///   [`crate::Synchronizer`].
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the DNS domains hosted by the account
    async fn list_dns_domains(&self) -> Result<Vec<RemoteDomain>, crate::Error>;

    /// List the current record rows of `domain`
    async fn list_records(&self, domain: &str) -> Result<Vec<RemoteRecord>, crate::Error>;

    /// Create a DNS domain so that records can be added to it
    async fn create_domain(&self, domain: &str) -> Result<(), crate::Error>;

    /// Add a new record to `domain`
    async fn add_record(&self, domain: &str, record: &ZoneRecord) -> Result<(), crate::Error>;

    /// Replace TTL and rdata of the row identified by `row_id`
    async fn update_record(
        &self,
        domain: &str,
        row_id: &str,
        record: &ZoneRecord,
    ) -> Result<(), crate::Error>;

    /// Delete the row identified by `row_id`
    async fn delete_record(&self, domain: &str, row_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
