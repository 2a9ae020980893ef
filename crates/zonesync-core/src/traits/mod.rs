//! Core traits for zonesync
//!
//! - [`DnsProvider`]: Read and mutate records at a DNS hosting provider

pub mod dns_provider;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
