//! Configuration types for the sitecheck service

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::check::Target;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub collector: Option<CollectorConfig>,
    #[serde(default)]
    pub mode: RunMode,
}

/// Where the list of targets comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
    #[serde(rename = "static")]
    Static {
        #[serde(default)]
        targets: Vec<Target>,
    },
    #[serde(rename = "remote")]
    Remote {
        url: String,
        /// Named list to request, sent as the `server` query parameter
        #[serde(default)]
        group: Option<String>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Static {
            targets: Vec::new(),
        }
    }
}

/// Per-target probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub inspect_block_pages: bool,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            inspect_block_pages: true,
        }
    }
}

/// Batch scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum probes in flight, `null` for no limit
    #[serde(default = "default_concurrency")]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub scheduling: Scheduling,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            scheduling: Scheduling::default(),
        }
    }
}

/// How a concurrency limit is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheduling {
    /// Consecutive chunks, each awaited in full before the next starts
    #[default]
    Chunked,
    /// Sliding window: a new probe starts as soon as one finishes
    Pooled,
}

/// Collector endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub url: String,
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
    #[serde(default)]
    pub payload: PayloadFormat,
}

impl CollectorConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source_tag: default_source_tag(),
            payload: PayloadFormat::default(),
        }
    }
}

/// Shape of each record sent to the collector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// `{id, s, l, n}` records
    #[default]
    Compact,
    /// Target fields plus status, latency and note
    Full,
}

/// Process run mode
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Run one pass and exit
    #[default]
    Once,
    /// Run a pass at startup and another for every line read on stdin
    Interactive,
}

impl Config {
    /// Reject settings that can never produce a valid run
    pub fn validate(&self) -> crate::Result<()> {
        if self.batch.concurrency == Some(0) {
            return Err(crate::SitecheckError::Config(
                "batch.concurrency must be at least 1 (use null for no limit)".to_string(),
            ));
        }
        if self.probe.timeout_seconds == 0 {
            return Err(crate::SitecheckError::Config(
                "probe.timeout_seconds must be at least 1".to_string(),
            ));
        }
        if let SourceConfig::Remote { url, .. } = &self.source {
            if url.is_empty() {
                return Err(crate::SitecheckError::Config(
                    "source.url must not be empty".to_string(),
                ));
            }
        }
        if let Some(collector) = &self.collector {
            if collector.url.is_empty() {
                return Err(crate::SitecheckError::Config(
                    "collector.url must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> Option<usize> {
    Some(5)
}

fn default_source_tag() -> String {
    "github_action".to_string()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::SitecheckError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
