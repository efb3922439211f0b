//! Single-target HTTP probe and outcome classification

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use tokio::time::Instant;

use crate::check::{CheckResult, Outcome, Target};
use crate::config::ProbeConfig;
use crate::io::{HttpClient, HttpResponse, ResponseHead};
use crate::SitecheckError;

/// Markers of an access-block page served with a non-success status
static BLOCK_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)forbidden|access denied|عدم دسترسی|403")
        .expect("block page pattern is valid")
});

/// Issues one timed GET per target and classifies the response
pub struct Prober {
    http: Arc<dyn HttpClient>,
    timeout: Duration,
    inspect_block_pages: bool,
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober")
            .field("timeout", &self.timeout)
            .field("inspect_block_pages", &self.inspect_block_pages)
            .finish()
    }
}

impl Prober {
    pub fn new(config: &ProbeConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            timeout: config.timeout(),
            inspect_block_pages: config.inspect_block_pages,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check one target. Never fails: every error becomes an offline result.
    ///
    /// The timeout and the latency cover the wait for the response head only.
    pub async fn probe(&self, target: &Target) -> CheckResult {
        let start = Instant::now();
        let head = match tokio::time::timeout(self.timeout, self.http.open(&target.url)).await {
            Ok(head) => head,
            Err(_) => Err(SitecheckError::Timeout(self.timeout)),
        };
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = match head {
            Ok(head) => Ok(self.finish(head).await),
            Err(e) => Err(e),
        };
        let outcome = classify(response, self.inspect_block_pages);
        tracing::info!(
            "Checked {}: {} ({}ms)",
            target.name,
            outcome.status(),
            latency_ms
        );
        tracing::debug!("{} -> {}", target.url, outcome);

        CheckResult {
            target: target.clone(),
            latency_ms: Some(latency_ms),
            outcome,
        }
    }

    /// Read the body only when block-page inspection needs it
    async fn finish(&self, head: ResponseHead) -> HttpResponse {
        let status = head.status;
        if head.is_success() || !self.inspect_block_pages {
            return HttpResponse { status, body: None };
        }

        let body = tokio::time::timeout(self.timeout, head.text())
            .await
            .unwrap_or_else(|_| {
                tracing::debug!("Reading error page body timed out after {:?}", self.timeout);
                None
            });
        HttpResponse { status, body }
    }
}

/// Map a GET result to an outcome
pub fn classify(response: crate::Result<HttpResponse>, inspect_block_pages: bool) -> Outcome {
    match response {
        Ok(response) if response.is_success() => Outcome::Online {
            code: response.status,
        },
        Ok(response) => {
            let blocked = inspect_block_pages
                && response.body.as_deref().is_some_and(is_block_page);
            if blocked {
                Outcome::Blocked {
                    code: response.status,
                }
            } else {
                Outcome::HttpStatus {
                    code: response.status,
                }
            }
        }
        Err(SitecheckError::Timeout(_)) => Outcome::Timeout,
        Err(SitecheckError::Http(reason)) => Outcome::NetworkError { reason },
        Err(e) => Outcome::NetworkError {
            reason: e.to_string(),
        },
    }
}

/// Whether a response body looks like an access-block page
pub fn is_block_page(body: &str) -> bool {
    BLOCK_PAGE.is_match(body)
}
