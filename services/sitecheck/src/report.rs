//! Reporting check results to a remote collector

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::check::{CheckResult, Status, Target, TargetId};
use crate::config::{CollectorConfig, PayloadFormat};
use crate::io::HttpClient;

/// Compact wire record: status bit instead of a status string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactRecord {
    pub id: Option<TargetId>,
    pub s: u8,
    pub l: Option<u64>,
    pub n: String,
}

impl From<&CheckResult> for CompactRecord {
    fn from(result: &CheckResult) -> Self {
        Self {
            id: result.target.id.clone(),
            s: match result.status() {
                Status::Online => 1,
                Status::Offline => 0,
            },
            l: result.latency_ms,
            n: result.note(),
        }
    }
}

/// Full wire record: the target plus status, latency and note
#[derive(Debug, Clone, Serialize)]
pub struct FullRecord {
    #[serde(flatten)]
    pub target: Target,
    pub status: Status,
    pub latency: Option<u64>,
    pub note: String,
}

impl From<&CheckResult> for FullRecord {
    fn from(result: &CheckResult) -> Self {
        Self {
            target: result.target.clone(),
            status: result.status(),
            latency: result.latency_ms,
            note: result.note(),
        }
    }
}

/// Build the `{checks, source}` collector payload
pub fn build_payload(
    results: &[CheckResult],
    format: PayloadFormat,
    source_tag: &str,
) -> serde_json::Value {
    let checks = match format {
        PayloadFormat::Compact => {
            let records: Vec<CompactRecord> = results.iter().map(CompactRecord::from).collect();
            serde_json::json!(records)
        }
        PayloadFormat::Full => {
            let records: Vec<FullRecord> = results.iter().map(FullRecord::from).collect();
            serde_json::json!(records)
        }
    };
    serde_json::json!({ "checks": checks, "source": source_tag })
}

/// Trait for delivering a run's results
#[async_trait]
pub trait Reporter: Send + Sync + std::fmt::Debug {
    /// Deliver all results as a single payload
    async fn report(&self, results: &[CheckResult]) -> crate::Result<()>;
}

/// Sends results to the collector endpoint as one JSON POST
pub struct CollectorReporter {
    url: String,
    source_tag: String,
    payload: PayloadFormat,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for CollectorReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorReporter")
            .field("url", &self.url)
            .field("source_tag", &self.source_tag)
            .finish()
    }
}

impl CollectorReporter {
    pub fn new(config: &CollectorConfig, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!(
            "Created CollectorReporter for {} (source '{}')",
            config.url,
            config.source_tag
        );

        Self {
            url: config.url.clone(),
            source_tag: config.source_tag.clone(),
            payload: config.payload,
            http,
        }
    }
}

#[async_trait]
impl Reporter for CollectorReporter {
    async fn report(&self, results: &[CheckResult]) -> crate::Result<()> {
        let body = build_payload(results, self.payload, &self.source_tag);
        tracing::info!("Sending {} results to the collector", results.len());

        let response = self.http.post_json(&self.url, &body).await?;

        if !response.is_success() {
            return Err(crate::SitecheckError::Report(format!(
                "Collector responded with status {}: {}",
                response.status,
                response.body.unwrap_or_default()
            )));
        }

        tracing::info!("Results reported to the collector");
        Ok(())
    }
}
