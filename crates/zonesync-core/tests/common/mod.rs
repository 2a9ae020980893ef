//! Test doubles and common utilities for synchronizer contract tests
//!
//! [`MockDnsProvider`] keeps an in-memory account (domains and rows) and
//! records every call, so tests can assert both on the calls issued and on
//! the resulting remote state.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use zonesync_core::error::{Error, Result};
use zonesync_core::{DnsProvider, RemoteDomain, RemoteRecord, ZoneRecord};

/// A call received by the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    ListDomains,
    ListRecords(String),
    CreateDomain(String),
    Add { domain: String, record: ZoneRecord },
    Update { domain: String, row_id: String, record: ZoneRecord },
    Delete { domain: String, row_id: String },
}

impl ProviderCall {
    /// True for calls that change remote state
    pub fn is_mutating(&self) -> bool {
        !matches!(self, ProviderCall::ListDomains | ProviderCall::ListRecords(_))
    }
}

#[derive(Debug, Default)]
struct MockState {
    domains: BTreeMap<String, Vec<RemoteRecord>>,
    calls: Vec<ProviderCall>,
    next_id: u64,
    failing_fetches: BTreeSet<String>,
    failing_creates: BTreeSet<String>,
    failing_rdata: BTreeSet<String>,
    fail_domain_list: bool,
}

/// In-memory provider that records calls
///
/// Clones share state, so a test can hand one clone to the synchronizer and
/// inspect another.
#[derive(Debug, Clone, Default)]
pub struct MockDnsProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a remote domain with the given `(row_id, name, ttl, type, rdata)` rows
    pub fn with_domain(self, domain: &str, rows: &[(&str, &str, &str, &str, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let rows = rows
                .iter()
                .map(|(id, name, ttl, rdtype, rdata)| RemoteRecord {
                    row_id: id.to_string(),
                    name: name.to_string(),
                    ttl: ttl.to_string(),
                    rdtype: rdtype.to_string(),
                    rdata: rdata.to_string(),
                })
                .collect();
            state.domains.insert(domain.to_string(), rows);
            state.next_id = 1000;
        }
        self
    }

    /// Make `list_records` fail for `domain`
    pub fn failing_fetch(self, domain: &str) -> Self {
        self.state.lock().unwrap().failing_fetches.insert(domain.to_string());
        self
    }

    /// Make `create_domain` fail for `domain`
    pub fn failing_create(self, domain: &str) -> Self {
        self.state.lock().unwrap().failing_creates.insert(domain.to_string());
        self
    }

    /// Make add/update fail for records carrying `rdata`
    pub fn failing_rdata(self, rdata: &str) -> Self {
        self.state.lock().unwrap().failing_rdata.insert(rdata.to_string());
        self
    }

    /// Make `list_dns_domains` fail
    pub fn failing_domain_list(self) -> Self {
        self.state.lock().unwrap().fail_domain_list = true;
        self
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change remote state, in order
    pub fn mutating_calls(&self) -> Vec<ProviderCall> {
        self.calls().into_iter().filter(ProviderCall::is_mutating).collect()
    }

    /// Forget recorded calls, keep remote state
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Current rows of `domain`
    pub fn rows(&self, domain: &str) -> Option<Vec<RemoteRecord>> {
        self.state.lock().unwrap().domains.get(domain).cloned()
    }

    fn record(&self, call: ProviderCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn not_found(command: &str, domain: &str) -> Error {
    Error::remote(command, 2151, format!("Domain {} not found", domain))
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_dns_domains(&self) -> Result<Vec<RemoteDomain>> {
        self.record(ProviderCall::ListDomains);
        let state = self.state.lock().unwrap();
        if state.fail_domain_list {
            return Err(Error::http("connection refused"));
        }
        Ok(state
            .domains
            .keys()
            .map(|name| RemoteDomain {
                name: name.clone(),
                status: "active".to_string(),
                kind: "primary".to_string(),
            })
            .collect())
    }

    async fn list_records(&self, domain: &str) -> Result<Vec<RemoteRecord>> {
        self.record(ProviderCall::ListRecords(domain.to_string()));
        let state = self.state.lock().unwrap();
        if state.failing_fetches.contains(domain) {
            return Err(Error::remote("dns-rows-list", 2000, "Internal error"));
        }
        state
            .domains
            .get(domain)
            .cloned()
            .ok_or_else(|| not_found("dns-rows-list", domain))
    }

    async fn create_domain(&self, domain: &str) -> Result<()> {
        self.record(ProviderCall::CreateDomain(domain.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.failing_creates.contains(domain) {
            return Err(Error::remote("dns-domain-add", 2209, "Domain name is not valid"));
        }
        state.domains.entry(domain.to_string()).or_default();
        Ok(())
    }

    async fn add_record(&self, domain: &str, record: &ZoneRecord) -> Result<()> {
        self.record(ProviderCall::Add {
            domain: domain.to_string(),
            record: record.clone(),
        });
        let mut state = self.state.lock().unwrap();
        if state.failing_rdata.contains(&record.rdata) {
            return Err(Error::remote("dns-row-add", 2300, "Invalid rdata"));
        }
        state.next_id += 1;
        let row_id = state.next_id.to_string();
        let rows = state
            .domains
            .get_mut(domain)
            .ok_or_else(|| not_found("dns-row-add", domain))?;
        rows.push(RemoteRecord {
            row_id,
            // the provider reports the apex as an empty name
            name: if record.name == "@" { String::new() } else { record.name.clone() },
            ttl: record.ttl.clone(),
            rdtype: record.rtype.clone(),
            rdata: record.rdata.clone(),
        });
        Ok(())
    }

    async fn update_record(&self, domain: &str, row_id: &str, record: &ZoneRecord) -> Result<()> {
        self.record(ProviderCall::Update {
            domain: domain.to_string(),
            row_id: row_id.to_string(),
            record: record.clone(),
        });
        let mut state = self.state.lock().unwrap();
        if state.failing_rdata.contains(&record.rdata) {
            return Err(Error::remote("dns-row-update", 2300, "Invalid rdata"));
        }
        let row = state
            .domains
            .get_mut(domain)
            .and_then(|rows| rows.iter_mut().find(|row| row.row_id == row_id))
            .ok_or_else(|| not_found("dns-row-update", domain))?;
        row.ttl = record.ttl.clone();
        row.rdata = record.rdata.clone();
        Ok(())
    }

    async fn delete_record(&self, domain: &str, row_id: &str) -> Result<()> {
        self.record(ProviderCall::Delete {
            domain: domain.to_string(),
            row_id: row_id.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        let rows = state
            .domains
            .get_mut(domain)
            .ok_or_else(|| not_found("dns-row-delete", domain))?;
        rows.retain(|row| row.row_id != row_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Write zone files into a fresh temporary directory
pub fn zone_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (domain, text) in files {
        std::fs::write(dir.path().join(format!("{}.zone", domain)), text).unwrap();
    }
    dir
}
