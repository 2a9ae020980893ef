//! Zone file generation from provider state
//!
//! The only remote -> file direction in zonesync. Existing zone files for
//! the listed domains are overwritten.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::normalize::normalize_remote_all;
use crate::traits::DnsProvider;
use crate::zone::{DEFAULT_ZONE_TTL, ZoneDirectory, render_zone};

/// Writes one zone file per remote DNS domain
pub struct Generator {
    provider: Box<dyn DnsProvider>,
}

impl Generator {
    pub fn new(provider: Box<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    /// Generate zone files for every remote DNS domain.
    ///
    /// Domains whose rows cannot be fetched, that have no rows, or whose
    /// file cannot be written are skipped. Returns the paths written.
    pub async fn generate_all(&self, zones: &ZoneDirectory) -> Result<Vec<PathBuf>> {
        let domains = self.provider.list_dns_domains().await?;
        if domains.is_empty() {
            info!("No DNS domains found at {}", self.provider.provider_name());
            return Ok(Vec::new());
        }

        let mut written = Vec::new();
        for domain in domains {
            if domain.name.is_empty() {
                continue;
            }

            let rows = match self.provider.list_records(&domain.name).await {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Skipping {}: failed to fetch records: {}", domain.name, e);
                    continue;
                }
            };
            if rows.is_empty() {
                info!("No records for DNS domain {}", domain.name);
                continue;
            }

            let records = normalize_remote_all(&rows);
            let text = render_zone(&domain.name, DEFAULT_ZONE_TTL, &records);
            let path = match zones.write(&domain.name, &text).await {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping {}: failed to write zone file: {}", domain.name, e);
                    continue;
                }
            };
            info!("Generated {} ({} record(s))", path.display(), records.len());
            written.push(path);
        }

        Ok(written)
    }
}
