//! Target list sources

use std::sync::Arc;

use async_trait::async_trait;

use crate::check::Target;
use crate::config::SourceConfig;
use crate::io::HttpClient;

/// Trait for obtaining the targets of a run
#[async_trait]
pub trait TargetSource: Send + Sync + std::fmt::Debug {
    /// List the targets to check. Failures are logged and yield an empty list.
    async fn list_targets(&self) -> Vec<Target>;
}

/// Build the source described by the configuration
pub fn from_config(config: &SourceConfig, http: Arc<dyn HttpClient>) -> Arc<dyn TargetSource> {
    match config {
        SourceConfig::Static { targets } => Arc::new(StaticSource::new(targets.clone())),
        SourceConfig::Remote { url, group } => {
            Arc::new(RemoteSource::new(url, group.as_deref(), http))
        }
    }
}

/// A fixed list of targets
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    targets: Vec<Target>,
}

impl StaticSource {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }
}

#[async_trait]
impl TargetSource for StaticSource {
    async fn list_targets(&self) -> Vec<Target> {
        self.targets.clone()
    }
}

/// Fetches a JSON array of targets from a list endpoint
pub struct RemoteSource {
    url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("url", &self.url)
            .finish()
    }
}

impl RemoteSource {
    /// `group` selects a named list through the `server` query parameter
    pub fn new(url: &str, group: Option<&str>, http: Arc<dyn HttpClient>) -> Self {
        let url = match group {
            Some(group) => match reqwest::Url::parse_with_params(url, &[("server", group)]) {
                Ok(with_group) => with_group.to_string(),
                Err(e) => {
                    tracing::warn!("Invalid list URL {}: {}", url, e);
                    url.to_string()
                }
            },
            None => url.to_string(),
        };

        Self { url, http }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> crate::Result<Vec<Target>> {
        let response = self.http.get(&self.url).await?;
        if !response.is_success() {
            return Err(crate::SitecheckError::Http(format!(
                "List endpoint returned status {}",
                response.status
            )));
        }
        let body = response.body.ok_or_else(|| {
            crate::SitecheckError::Http("List endpoint body could not be read".to_string())
        })?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TargetSource for RemoteSource {
    async fn list_targets(&self) -> Vec<Target> {
        tracing::info!("Fetching target list from {}", self.url);
        match self.fetch().await {
            Ok(targets) => {
                tracing::info!("Fetched {} targets", targets.len());
                targets
            }
            Err(e) => {
                tracing::warn!("Failed to fetch target list: {}", e);
                Vec::new()
            }
        }
    }
}
