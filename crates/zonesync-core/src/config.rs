//! Configuration types for zonesync
//!
//! The configuration is a single JSON document, loaded once at startup and
//! passed by value into the components that need it.
//!
//! ```json
//! {
//!   "provider": { "type": "wedos", "user": "admin@example.com", "password": "..." },
//!   "zone_dir": "zone",
//!   "report_path": "comparison.csv",
//!   "sync": { "deletion_enabled": false, "dry_run": false }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the WEDOS user
pub const ENV_WEDOS_USER: &str = "ZONESYNC_WEDOS_USER";

/// Environment variable overriding the WEDOS password
pub const ENV_WEDOS_PASSWORD: &str = "ZONESYNC_WEDOS_PASSWORD";

/// Main zonesync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSyncConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Directory holding `<domain>.zone` files
    #[serde(default = "default_zone_dir")]
    pub zone_dir: PathBuf,

    /// Where the comparison report is written
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Synchronizer policy
    #[serde(default)]
    pub sync: SyncOptions,
}

impl ZoneSyncConfig {
    /// Create a configuration with defaults for everything but the provider
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            zone_dir: default_zone_dir(),
            report_path: default_report_path(),
            sync: SyncOptions::default(),
        }
    }

    /// Parse a configuration document
    pub fn from_json(text: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file, apply environment overrides and validate
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            crate::Error::config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_json(&text)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override credentials from the environment.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let ProviderConfig::Wedos { user, password, .. } = &mut self.provider {
            if let Some(value) = lookup(ENV_WEDOS_USER).filter(|v| !v.is_empty()) {
                *user = value;
            }
            if let Some(value) = lookup(ENV_WEDOS_PASSWORD).filter(|v| !v.is_empty()) {
                *password = value;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_dir.as_os_str().is_empty() {
            return Err(crate::Error::config("zone_dir cannot be empty"));
        }
        self.provider.validate()
    }
}

fn default_zone_dir() -> PathBuf {
    PathBuf::from("zone")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("comparison.csv")
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// WEDOS WAPI
    Wedos {
        /// WAPI login (account e-mail)
        user: String,
        /// WAPI password
        password: String,
        /// Endpoint override, mainly for testing
        #[serde(default)]
        api_url: Option<String>,
        /// Send requests in WAPI test mode (validated, not executed)
        #[serde(default)]
        test: bool,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Wedos { user, password, .. } => {
                if user.is_empty() {
                    return Err(crate::Error::config("WEDOS user cannot be empty"));
                }
                if password.is_empty() {
                    return Err(crate::Error::config("WEDOS password cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Wedos { .. } => "wedos",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Wedos {
                user,
                api_url,
                test,
                ..
            } => f
                .debug_struct("Wedos")
                .field("user", user)
                .field("password", &"<REDACTED>")
                .field("api_url", api_url)
                .field("test", test)
                .finish(),
            ProviderConfig::Custom { factory, .. } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .finish_non_exhaustive(),
        }
    }
}

/// Synchronizer policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Send deletions for records that exist only remotely.
    ///
    /// Off by default: synchronization only adds and corrects.
    #[serde(default)]
    pub deletion_enabled: bool,

    /// Plan and report every operation without calling the provider
    #[serde(default)]
    pub dry_run: bool,
}
