use super::errors::ProbeError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Healthy,
    Unhealthy,
    Skipped,
    Ready,
    NotReady,
}

impl CheckStatus {
    fn default_message(self) -> &'static str {
        match self {
            Self::Healthy => "Dependency is healthy",
            Self::Unhealthy => "Dependency is unhealthy",
            Self::Skipped => "Check skipped",
            Self::Ready => "Ready",
            Self::NotReady => "Not ready",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
    #[serde(flatten)]
    pub metadata: IndexMap<String, serde_json::Value>,
}

impl CheckResult {
    pub fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            status.default_message().to_string()
        } else {
            message
        };

        Self {
            status,
            message,
            metadata: IndexMap::new(),
        }
    }

    pub fn healthy(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Healthy, message)
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Unhealthy, message)
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Skipped, message)
    }

    pub fn ready(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Ready, message)
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::NotReady, message)
    }

    /// Failing result: `"<context>: <error>"` plus the error kind under `error`.
    pub fn failed(status: CheckStatus, context: &str, error: &ProbeError) -> Self {
        Self::new(status, format!("{}: {}", context, error)).with_meta("error", error.kind())
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Alive,
    Ready,
    NotReady,
    Started,
    Starting,
    Healthy,
}

impl OverallStatus {
    pub fn is_passing(self) -> bool {
        !matches!(self, Self::NotReady | Self::Starting)
    }

    pub fn http_status(self) -> u16 {
        if self.is_passing() {
            200
        } else {
            503
        }
    }
}

/// Outcome of one endpoint invocation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Verdict {
    pub status: OverallStatus,
    pub checks: IndexMap<String, CheckResult>,
}

impl Verdict {
    pub fn new(status: OverallStatus) -> Self {
        Self {
            status,
            checks: IndexMap::new(),
        }
    }

    pub fn http_status(&self) -> u16 {
        self.status.http_status()
    }

    pub fn is_passing(&self) -> bool {
        self.status.is_passing()
    }
}
