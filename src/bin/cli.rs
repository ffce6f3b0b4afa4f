//! skuwatch CLI
//!
//! Runs one availability check per invocation. Schedule it externally
//! (cron, CI) and keep runs from overlapping.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use skuwatch::{
    error::Result,
    models::{Config, Delivery},
    pipeline::{CheckOutcome, Trigger, Watcher},
    services::{FilePageSource, HttpPageSource, PageSource, build_notifier},
    storage::{LocalSnapshotStore, SnapshotStore},
};

/// skuwatch - configurator stock watcher
#[derive(Parser, Debug)]
#[command(
    name = "skuwatch",
    version,
    about = "Alerts when the set of available SKUs on a product page changes"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "SKUWATCH_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one check cycle
    Check {
        /// Send an alert regardless of changes without updating the snapshot
        #[arg(long)]
        force: bool,

        /// Read every facet from a saved HTML file instead of the network
        #[arg(long)]
        html: Option<PathBuf>,

        /// Snapshot file (default: watch.status_file)
        #[arg(long)]
        status_file: Option<PathBuf>,

        /// Product page URL (default: watch.product_url)
        #[arg(long)]
        url: Option<String>,
    },

    /// Validate configuration and page selectors
    Validate,

    /// Show the stored snapshot
    Info {
        /// Snapshot file (default: watch.status_file)
        #[arg(long)]
        status_file: Option<PathBuf>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_if_present(path)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config {}: {}", cli.config.display(), e);
            return Err(e);
        }
    };

    match cli.command {
        Command::Check {
            force,
            html,
            status_file,
            url,
        } => {
            config.watch.force_notify |= force;
            if let Some(path) = status_file {
                config.watch.status_file = path;
            }
            if let Some(url) = url {
                config.watch.product_url = url;
            }

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let source: Box<dyn PageSource> = match html {
                Some(path) => {
                    log::info!("Reading saved page {}", path.display());
                    Box::new(FilePageSource::new(path))
                }
                None => Box::new(HttpPageSource::new(
                    &config.fetch,
                    config.watch.product_url.clone(),
                )?),
            };
            let store = Box::new(LocalSnapshotStore::new(&config.watch.status_file));
            let notifier = build_notifier(&config.notify)?;

            let watcher = Watcher::new(&config, source, store, notifier)?;
            match watcher.run().await? {
                CheckOutcome::Unknown { reason } => {
                    log::warn!("Status unknown: {}", reason);
                }
                CheckOutcome::Unchanged {
                    available,
                    persisted,
                } => {
                    log::info!(
                        "Unchanged: {} available{}",
                        available,
                        if persisted { " (snapshot created)" } else { "" }
                    );
                }
                CheckOutcome::Notified {
                    trigger,
                    available,
                    persisted,
                    delivery,
                } => {
                    let kind = match trigger {
                        Trigger::Forced => "forced alert".to_string(),
                        Trigger::Changed { added, removed } => {
                            format!("change alert (+{added} / -{removed})")
                        }
                    };
                    log::info!(
                        "Finished {}: {} available, snapshot {}, delivery {}",
                        kind,
                        available,
                        if persisted { "updated" } else { "untouched" },
                        match delivery {
                            Delivery::Sent => "ok",
                            Delivery::Skipped => "skipped (no webhook)",
                            Delivery::Failed => "failed",
                        }
                    );
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} facets, selectors compile, webhook {})",
                config.facets.len(),
                if config.notify.webhook_url.is_some() {
                    "set"
                } else {
                    "not set"
                }
            );
        }

        Command::Info { status_file } => {
            let path = status_file.unwrap_or(config.watch.status_file);
            let store = LocalSnapshotStore::new(&path);
            log::info!("Snapshot file: {}", store.location());

            match store.load_snapshot().await {
                Some(snapshot) => {
                    match snapshot.updated_at {
                        Some(updated) => log::info!("Last updated: {}", updated.to_rfc3339()),
                        None => log::info!("Last updated: unknown"),
                    }
                    log::info!("Available SKUs: {}", snapshot.available_skus.len());
                    if !snapshot.fingerprint.is_empty() {
                        log::info!("Fingerprint: {}", snapshot.fingerprint);
                    }
                    for sku in &snapshot.available_skus {
                        log::info!("  • {}", sku.summary());
                    }
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    Ok(())
}
