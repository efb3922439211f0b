//! Error types for the sitecheck service

/// Errors that can occur in the sitecheck service
#[derive(Debug, thiserror::Error)]
pub enum SitecheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report failed: {0}")]
    Report(String),

    #[error("A check run is already in progress")]
    AlreadyRunning,
}

/// Result type alias for sitecheck operations
pub type Result<T> = std::result::Result<T, SitecheckError>;
