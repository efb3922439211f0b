//! Sitecheck CLI
//!
//! Command-line interface for the website uptime checker.

use std::path::PathBuf;

use clap::Parser;
use sitecheck::config::{CollectorConfig, RunMode, SourceConfig};
use sitecheck::{load_config, Config, SitecheckBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(about = "Website uptime checker with collector reporting")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run mode (overrides config file)
    #[arg(short, long, value_enum)]
    mode: Option<RunMode>,

    /// Fetch targets from this list endpoint (overrides config file)
    #[arg(long)]
    list_url: Option<String>,

    /// Named list to request from the list endpoint
    #[arg(long, requires = "list_url")]
    list_group: Option<String>,

    /// Report results to this collector endpoint (overrides config file)
    #[arg(long)]
    collector_url: Option<String>,

    /// Maximum concurrent probes (overrides config file)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, mode={:?}, log_level={:?}",
        args.config,
        args.mode,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(url) = args.list_url {
        config.source = SourceConfig::Remote {
            url,
            group: args.list_group,
        };
    }
    if let Some(url) = args.collector_url {
        match &mut config.collector {
            Some(collector) => collector.url = url,
            None => config.collector = Some(CollectorConfig::new(url)),
        }
    }
    if let Some(concurrency) = args.concurrency {
        config.batch.concurrency = Some(concurrency);
    }

    tracing::info!("Starting sitecheck");
    SitecheckBuilder::new(config).build()?.start().await?;

    Ok(())
}
