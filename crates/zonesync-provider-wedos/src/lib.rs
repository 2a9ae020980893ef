// # WEDOS DNS Provider
//
// This crate provides a WEDOS WAPI implementation of `DnsProvider` for
// zonesync.
//
// ## Behaviour
//
// - One HTTP request per trait call, no retries and no caching
// - HTTP timeout configured (10 seconds)
// - Non-1000 WAPI codes surface as `Error::Remote` with the command name
// - Transport failures surface as `Error::Http`
// - List-shaped and map-shaped collections are both accepted
// - Optional WAPI test mode (`"test": 1`), where WEDOS validates but does
//   not execute mutating commands
//
// ## Security Requirements
//
// - The password NEVER appears in logs or `Debug` output
// - Construction fails if user or password is empty
//
// ## API Reference
//
// - Endpoint: POST `https://api.wedos.com/wapi/json`
// - `dns-domains-list`: all DNS domains of the account (`data.domain`)
// - `dns-rows-list {domain}`: rows of a domain (`data.row`)
// - `dns-domain-add {name, type}`: create a primary DNS domain
// - `dns-row-add {domain, name, ttl, type, rdata}`
// - `dns-row-update {domain, row_id, ttl, rdata}`
// - `dns-row-delete {domain, row_id}`

pub mod wapi;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use zonesync_core::config::ProviderConfig;
use zonesync_core::record::APEX;
use zonesync_core::remote::collection_from_value;
use zonesync_core::traits::{DnsProvider, DnsProviderFactory};
use zonesync_core::{Error, RemoteDomain, RemoteRecord, Result, ZoneRecord};

/// WAPI JSON endpoint
pub const WAPI_URL: &str = "https://api.wedos.com/wapi/json";

/// Default HTTP timeout for API requests (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// WEDOS WAPI provider
///
/// Stateless apart from the HTTP client. Each call computes a fresh auth
/// token, so a provider can outlive the hour it was created in.
pub struct WedosProvider {
    /// WAPI login
    user: String,

    /// WAPI password
    /// NEVER log this value
    password: String,

    /// Endpoint URL
    api_url: String,

    /// Attach `"test": 1` to every request
    test_mode: bool,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for WedosProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WedosProvider")
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("api_url", &self.api_url)
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

impl WedosProvider {
    /// Create a new WEDOS provider
    ///
    /// # Parameters
    ///
    /// - `user`: WAPI login (account e-mail)
    /// - `password`: WAPI password
    /// - `api_url`: Endpoint override, `None` for the public endpoint
    /// - `test_mode`: Ask WEDOS to validate requests without executing them
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        api_url: Option<String>,
        test_mode: bool,
    ) -> Result<Self> {
        let user = user.into();
        let password = password.into();

        if user.is_empty() {
            return Err(Error::config("WEDOS user cannot be empty"));
        }
        if password.is_empty() {
            return Err(Error::config("WEDOS password cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            user,
            password,
            api_url: api_url.unwrap_or_else(|| WAPI_URL.to_string()),
            test_mode,
            client,
        })
    }

    /// Endpoint this provider talks to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue one WAPI command and return its `data` payload
    async fn call(&self, command: &str, data: Option<Value>) -> Result<Value> {
        let auth = wapi::auth_token(&self.user, &self.password, &wapi::current_hour());
        let cl_trid = format!("zonesync-{}", command);
        let request = wapi::build_request(&self.user, &auth, command, &cl_trid, data, self.test_mode);

        tracing::debug!("WAPI request: {}", command);

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(wapi::encode_body(&request))
            .send()
            .await
            .map_err(|e| Error::http(format!("{} request failed: {}", command, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::http(format!(
                "{} returned HTTP {}: {}",
                command, status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::provider("wedos", format!("Failed to parse {} response: {}", command, e)))?;

        wapi::parse_response(command, &body)
    }
}

/// WEDOS names the apex with an empty string
fn wire_name(name: &str) -> &str {
    if name == APEX { "" } else { name }
}

#[async_trait]
impl DnsProvider for WedosProvider {
    async fn list_dns_domains(&self) -> Result<Vec<RemoteDomain>> {
        let data = self.call("dns-domains-list", None).await?;
        let domains: Vec<RemoteDomain> = collection_from_value(&data, "domain");
        tracing::debug!("WEDOS lists {} DNS domains", domains.len());
        Ok(domains)
    }

    async fn list_records(&self, domain: &str) -> Result<Vec<RemoteRecord>> {
        let data = self
            .call("dns-rows-list", Some(json!({ "domain": domain })))
            .await?;
        let rows: Vec<RemoteRecord> = collection_from_value(&data, "row");
        tracing::debug!("WEDOS lists {} rows for {}", rows.len(), domain);
        Ok(rows)
    }

    async fn create_domain(&self, domain: &str) -> Result<()> {
        self.call(
            "dns-domain-add",
            Some(json!({ "name": domain, "type": "primary" })),
        )
        .await?;
        Ok(())
    }

    async fn add_record(&self, domain: &str, record: &ZoneRecord) -> Result<()> {
        let mut data = json!({
            "domain": domain,
            "name": wire_name(&record.name),
            "type": record.rtype,
            "rdata": record.rdata,
        });
        // an empty TTL lets WEDOS apply its default
        if !record.ttl.is_empty() {
            data["ttl"] = json!(record.ttl);
        }
        self.call("dns-row-add", Some(data)).await?;
        Ok(())
    }

    async fn update_record(&self, domain: &str, row_id: &str, record: &ZoneRecord) -> Result<()> {
        let mut data = json!({
            "domain": domain,
            "row_id": row_id,
            "rdata": record.rdata,
        });
        if !record.ttl.is_empty() {
            data["ttl"] = json!(record.ttl);
        }
        self.call("dns-row-update", Some(data)).await?;
        Ok(())
    }

    async fn delete_record(&self, domain: &str, row_id: &str) -> Result<()> {
        self.call(
            "dns-row-delete",
            Some(json!({ "domain": domain, "row_id": row_id })),
        )
        .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "wedos"
    }
}

/// Factory for creating WEDOS providers
pub struct WedosFactory;

impl DnsProviderFactory for WedosFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Wedos {
                user,
                password,
                api_url,
                test,
            } => {
                if *test {
                    tracing::warn!("WEDOS provider running in WAPI test mode - no changes will be executed");
                }

                Ok(Box::new(WedosProvider::new(
                    user.clone(),
                    password.clone(),
                    api_url.clone(),
                    *test,
                )?))
            }
            _ => Err(Error::config("Invalid config for WEDOS provider")),
        }
    }
}

/// Register the WEDOS provider with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// zonesync_provider_wedos::register(&registry);
/// assert!(registry.has_provider("wedos"));
/// ```
pub fn register(registry: &zonesync_core::ProviderRegistry) {
    registry.register_provider("wedos", Box::new(WedosFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wedos_config(user: &str, password: &str) -> ProviderConfig {
        ProviderConfig::Wedos {
            user: user.to_string(),
            password: password.to_string(),
            api_url: None,
            test: false,
        }
    }

    #[test]
    fn test_factory_creation() {
        let provider = WedosFactory.create(&wedos_config("admin@example.com", "secret"));
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().provider_name(), "wedos");
    }

    #[test]
    fn test_factory_missing_credentials() {
        assert!(WedosFactory.create(&wedos_config("", "secret")).is_err());
        assert!(WedosFactory.create(&wedos_config("admin@example.com", "")).is_err());
    }

    #[test]
    fn test_factory_rejects_other_config() {
        let config = ProviderConfig::Custom {
            factory: "other".to_string(),
            config: json!({}),
        };
        assert!(matches!(WedosFactory.create(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_endpoint() {
        let provider = WedosProvider::new("u", "p", None, false).unwrap();
        assert_eq!(provider.api_url(), WAPI_URL);

        let provider = WedosProvider::new("u", "p", Some("http://127.0.0.1:1/wapi/json".to_string()), false).unwrap();
        assert_eq!(provider.api_url(), "http://127.0.0.1:1/wapi/json");
    }

    #[test]
    fn test_password_not_exposed_in_debug() {
        let provider = WedosProvider::new("admin@example.com", "secret_password_12345", None, false).unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_password_12345"));
        assert!(debug_str.contains("WedosProvider"));
        assert!(debug_str.contains("admin@example.com"));
    }

    #[test]
    fn test_apex_wire_name() {
        assert_eq!(wire_name("@"), "");
        assert_eq!(wire_name("www"), "www");
    }

    #[test]
    fn test_register() {
        let registry = zonesync_core::ProviderRegistry::new();
        register(&registry);
        assert!(registry.has_provider("wedos"));
        assert!(registry.create_provider(&wedos_config("u", "p")).is_ok());
    }
}
