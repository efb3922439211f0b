//! BDD test world for sitecheck service

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cucumber::World;
use tokio::sync::RwLock;

use sitecheck::check::{CheckResult, Target};
use sitecheck::engine::RunSummary;
use sitecheck::io::{HttpClient, HttpResponse, ResponseHead};
use sitecheck::{Config, SitecheckError};

/// Canned behavior for one URL
#[derive(Debug, Clone)]
pub enum Script {
    Respond {
        status: u16,
        body: Option<String>,
        delay: Duration,
    },
    Refuse,
    Hang,
}

impl Script {
    pub fn status(status: u16) -> Self {
        Script::Respond {
            status,
            body: Some(String::new()),
            delay: Duration::ZERO,
        }
    }
}

/// An HTTP client serving scripted GETs and recording POSTed JSON bodies
#[derive(Debug, Clone)]
pub struct ScriptedHttpClient {
    pub routes: HashMap<String, Script>,
    pub collector_status: u16,
    pub posts: Arc<RwLock<Vec<serde_json::Value>>>,
}

impl Default for ScriptedHttpClient {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
            collector_status: 200,
            posts: Arc::default(),
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, url: &str) -> sitecheck::Result<HttpResponse> {
        match self.routes.get(url).cloned().unwrap_or(Script::Refuse) {
            Script::Respond {
                status,
                body,
                delay,
            } => {
                tokio::time::sleep(delay).await;
                Ok(HttpResponse { status, body })
            }
            Script::Refuse => Err(SitecheckError::Http(format!(
                "GET {} failed: connection refused",
                url
            ))),
            Script::Hang => std::future::pending().await,
        }
    }

    async fn open(&self, url: &str) -> sitecheck::Result<ResponseHead> {
        let response = self.get(url).await?;
        Ok(ResponseHead::buffered(response.status, response.body))
    }

    async fn post_json(
        &self,
        _url: &str,
        body: &serde_json::Value,
    ) -> sitecheck::Result<HttpResponse> {
        self.posts.write().await.push(body.clone());
        Ok(HttpResponse {
            status: self.collector_status,
            body: Some(if self.collector_status == 200 {
                "ok".to_string()
            } else {
                "collector unavailable".to_string()
            }),
        })
    }
}

#[derive(Debug, Default, World)]
pub struct SitecheckWorld {
    pub http: ScriptedHttpClient,

    // Probe testing
    pub probe_result: Option<CheckResult>,
    pub probe_elapsed: Option<Duration>,

    // Batch testing
    pub targets: Vec<Target>,
    pub batch_results: Option<Vec<CheckResult>>,

    // Report testing
    pub report_results: Vec<CheckResult>,
    pub report_delivered: Option<bool>,

    // Source testing
    pub listed: Option<Vec<Target>>,

    // Lifecycle testing
    pub config: Option<Config>,
    pub site_delay: Duration,
    pub run: Option<RunSummary>,
    pub build_error: Option<String>,
}
