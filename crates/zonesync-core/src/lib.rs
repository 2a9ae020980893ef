// # zonesync-core
//
// Core library for keeping local DNS zone files and a DNS hosting provider
// in sync.
//
// ## Architecture Overview
//
// - **ZoneRecord**: Canonical `(name, ttl, type, rdata)` record value
// - **zone**: Zone file parsing, rendering and the on-disk zone directory
// - **remote / normalize**: Provider wire shapes reduced to `ZoneRecord`s
// - **diff**: Three-way comparison (matching / local-only / remote-only)
// - **Synchronizer**: Drives the provider towards the zone files
// - **DnsProvider**: Trait implemented by provider crates
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Files are desired state**: Reconciliation flows file -> provider
// 2. **Additive by default**: Deletions are reported, sent only when enabled
// 3. **Sequential**: One provider call in flight at a time
// 4. **Idempotent**: Re-running with unchanged state issues no changes
// 5. **Library-First**: The binary is a thin layer over this crate

pub mod config;
pub mod diff;
pub mod error;
pub mod generate;
pub mod normalize;
pub mod record;
pub mod registry;
pub mod remote;
pub mod report;
pub mod sync;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use config::{ProviderConfig, SyncOptions, ZoneSyncConfig};
pub use diff::{DiffEntry, DiffStatus, diff_records};
pub use error::{Error, Result};
pub use generate::Generator;
pub use record::{RecordKey, RecordValue, ZoneRecord};
pub use registry::ProviderRegistry;
pub use remote::{RemoteDomain, RemoteRecord};
pub use report::{Comparer, ComparisonReport};
pub use sync::{DomainReport, Operation, OperationStatus, RunSummary, Synchronizer};
pub use traits::{DnsProvider, DnsProviderFactory};
pub use zone::{ZoneDirectory, ZoneFile, parse_zone, render_zone};
