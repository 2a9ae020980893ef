// # zonesync
//
// Thin command-line layer over `zonesync-core`. All reconciliation logic
// lives in the library; this binary reads configuration, registers the
// built-in providers and dispatches a subcommand.
//
// ## Commands
//
// - `sync [--dry-run] [--allow-delete] [DOMAIN...]`: push zone files to the provider
// - `compare [--output PATH]`: write the comparison report as CSV
// - `generate`: write zone files from the provider's current state
//
// ## Configuration
//
// A JSON file (default `config.json`), see `zonesync_core::config`.
// Credentials can be supplied through the environment instead:
//
// - `ZONESYNC_WEDOS_USER`
// - `ZONESYNC_WEDOS_PASSWORD`
// - `ZONESYNC_LOG_LEVEL`: used when `--log-level` is not given
//
// ## Example
//
// ```bash
// export ZONESYNC_WEDOS_PASSWORD=...
// zonesync --config config.json sync --dry-run
// zonesync compare --output comparison.csv
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::{
    Comparer, Generator, ProviderRegistry, RunSummary, Synchronizer, ZoneDirectory, ZoneSyncConfig,
};

/// Environment variable consulted when `--log-level` is absent
const ENV_LOG_LEVEL: &str = "ZONESYNC_LOG_LEVEL";

/// Exit codes for different termination scenarios
///
/// - 0: Command completed without failures
/// - 1: Configuration or startup error
/// - 2: Runtime error, including partial sync failures
#[derive(Debug, Clone, Copy)]
enum ZoneSyncExitCode {
    /// Command completed without failures
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error or failed operations
    RuntimeError = 2,
}

impl From<ZoneSyncExitCode> for ExitCode {
    fn from(code: ZoneSyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "zonesync")]
#[command(author, version, about = "Keep local DNS zone files and a DNS provider in sync")]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Zone directory, overrides `zone_dir` from the configuration
    #[arg(long, value_name = "DIR")]
    zone_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push zone files to the provider
    Sync {
        /// Plan and log operations without sending them
        #[arg(long)]
        dry_run: bool,

        /// Delete remote records that are not declared locally
        #[arg(long)]
        allow_delete: bool,

        /// Only synchronize these domains
        #[arg(value_name = "DOMAIN")]
        domains: Vec<String>,
    },

    /// Compare zone files with the provider and write a CSV report
    Compare {
        /// Report path, overrides `report_path` from the configuration
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write zone files from the provider's current records
    Generate,
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let level_name = cli
        .log_level
        .clone()
        .or_else(|| env::var(ENV_LOG_LEVEL).ok())
        .unwrap_or_else(|| "info".to_string());
    let Some(log_level) = parse_level(&level_name) else {
        eprintln!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            level_name
        );
        return ZoneSyncExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZoneSyncExitCode::ConfigError.into();
    }

    // Provider calls are strictly sequential, a single thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZoneSyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(cli)).into()
}

async fn run(cli: Cli) -> ZoneSyncExitCode {
    let mut config = match ZoneSyncConfig::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ZoneSyncExitCode::ConfigError;
        }
    };
    if let Some(zone_dir) = cli.zone_dir {
        config.zone_dir = zone_dir;
    }

    let registry = ProviderRegistry::new();
    register_providers(&registry);

    let provider = match registry.create_provider(&config.provider) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create provider '{}': {}", config.provider.type_name(), e);
            return ZoneSyncExitCode::ConfigError;
        }
    };
    info!("Using provider: {}", provider.provider_name());

    let result = match cli.command {
        Command::Sync {
            dry_run,
            allow_delete,
            domains,
        } => {
            let mut options = config.sync;
            options.dry_run |= dry_run;
            options.deletion_enabled |= allow_delete;
            run_sync(&config, Synchronizer::new(provider, options), &domains).await
        }
        Command::Compare { output } => {
            let output = output.unwrap_or_else(|| config.report_path.clone());
            run_compare(&config, Comparer::new(provider), output).await
        }
        Command::Generate => run_generate(&config, Generator::new(provider)).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ZoneSyncExitCode::RuntimeError
        }
    }
}

/// Register built-in providers
fn register_providers(registry: &ProviderRegistry) {
    #[cfg(feature = "wedos")]
    {
        zonesync_provider_wedos::register(registry);
    }

    if registry.list_providers().is_empty() {
        warn!("No providers compiled in");
    }
}

async fn run_sync(
    config: &ZoneSyncConfig,
    sync: Synchronizer,
    domains: &[String],
) -> Result<ZoneSyncExitCode> {
    let zones = ZoneDirectory::open(&config.zone_dir).await?;
    let options = sync.options();
    info!(
        "Synchronizing {} [dry-run: {}, deletions: {}]",
        zones.root().display(),
        options.dry_run,
        if options.deletion_enabled { "enabled" } else { "disabled" }
    );

    let summary = sync.run(&zones, domains).await.context("Synchronization failed")?;
    log_summary(&summary);

    Ok(if summary.is_clean() {
        ZoneSyncExitCode::Success
    } else {
        ZoneSyncExitCode::RuntimeError
    })
}

fn log_summary(summary: &RunSummary) {
    for domain in &summary.domains {
        if let Some(reason) = &domain.aborted {
            error!("{}: skipped ({})", domain.domain, reason);
            continue;
        }
        let candidates = domain.deletion_candidates();
        info!(
            "{}: {} added, {} updated, {} failed, {} not declared locally{}",
            domain.domain,
            domain.added(),
            domain.updated(),
            domain.failed(),
            candidates.len(),
            if domain.created() { " (domain created)" } else { "" }
        );
    }

    if summary.is_clean() {
        info!("Synchronization finished: {} domain(s)", summary.domains.len());
    } else {
        warn!(
            "Synchronization finished with {} failure(s) across {} domain(s)",
            summary.failures(),
            summary.domains.len()
        );
    }
}

async fn run_compare(
    config: &ZoneSyncConfig,
    comparer: Comparer,
    output: PathBuf,
) -> Result<ZoneSyncExitCode> {
    let zones = ZoneDirectory::open(&config.zone_dir).await?;
    let report = comparer.compare_all(&zones).await?;
    report
        .write_csv(&output)
        .await
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    info!("Comparison report written to {}", output.display());
    for (domain, reason) in &report.skipped {
        warn!("{}: not compared ({})", domain, reason);
    }

    Ok(if report.skipped.is_empty() {
        ZoneSyncExitCode::Success
    } else {
        ZoneSyncExitCode::RuntimeError
    })
}

async fn run_generate(config: &ZoneSyncConfig, generator: Generator) -> Result<ZoneSyncExitCode> {
    let zones = ZoneDirectory::create(&config.zone_dir).await?;
    let written = generator.generate_all(&zones).await?;
    info!("Generated {} zone file(s) in {}", written.len(), zones.root().display());
    Ok(ZoneSyncExitCode::Success)
}
