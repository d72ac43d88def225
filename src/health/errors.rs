use std::time::Duration;
use thiserror::Error;

/// Why a probe failed. Always absorbed into a failing `CheckResult`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProbeError {
    #[error("{0}")]
    DependencyUnreachable(String),
    #[error("{0}")]
    DependencyMisbehaving(String),
    #[error("{0}")]
    ResourceUnavailable(String),
    #[error("{0}")]
    ConfigurationMissing(String),
    #[error("{0}")]
    ServiceUnresolvable(String),
    #[error("check did not finish within {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("check aborted unexpectedly")]
    Aborted,
}

impl ProbeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DependencyUnreachable(_) => "dependency_unreachable",
            Self::DependencyMisbehaving(_) => "dependency_misbehaving",
            Self::ResourceUnavailable(_) => "resource_unavailable",
            Self::ConfigurationMissing(_) => "configuration_missing",
            Self::ServiceUnresolvable(_) => "service_unresolvable",
            Self::Timeout(_) => "timeout",
            Self::Aborted => "aborted",
        }
    }
}
