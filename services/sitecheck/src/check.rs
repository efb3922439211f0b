//! Targets, check outcomes and results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a target by the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Number(n) => write!(f, "{}", n),
            TargetId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A website to check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TargetId>,
    pub name: String,
    pub url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn with_id(mut self, id: TargetId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Reachability of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Online,
    Offline,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Online => write!(f, "Online"),
            Status::Offline => write!(f, "Offline"),
        }
    }
}

/// Classified result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server answered with a 2xx status
    Online { code: u16 },
    /// The server answered with a non-success status
    HttpStatus { code: u16 },
    /// Non-success status whose body looks like an access-block page
    Blocked { code: u16 },
    /// No response within the probe timeout
    Timeout,
    /// DNS, connection, TLS or other transport failure
    NetworkError { reason: String },
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Online { .. } => Status::Online,
            _ => Status::Offline,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Online { code } => write!(f, "Status: {}", code),
            Outcome::HttpStatus { code } => write!(f, "Error: {}", code),
            Outcome::Blocked { code } => write!(f, "Blocked: {} (access denied)", code),
            Outcome::Timeout => write!(f, "Timeout"),
            Outcome::NetworkError { reason } => write!(f, "Network error: {}", reason),
        }
    }
}

/// Result of checking one target during one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub target: Target,
    pub latency_ms: Option<u64>,
    pub outcome: Outcome,
}

impl CheckResult {
    pub fn status(&self) -> Status {
        self.outcome.status()
    }

    /// Human readable note rendered from the outcome
    pub fn note(&self) -> String {
        self.outcome.to_string()
    }
}
