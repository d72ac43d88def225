use super::Probe;
use crate::connectors::ServiceRegistry;
use crate::health::errors::ProbeError;
use crate::health::models::{CheckResult, CheckStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// Services the application cannot run without.
pub const CORE_SERVICES: [&str; 3] = ["db", "cache", "config"];

pub struct ServicesProbe {
    registry: Arc<ServiceRegistry>,
}

impl ServicesProbe {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Probe for ServicesProbe {
    async fn check(&self) -> CheckResult {
        let resolved = CORE_SERVICES
            .iter()
            .try_for_each(|service| self.registry.resolve(service));

        match resolved {
            Ok(()) => CheckResult::ready("Core services bound"),
            Err(e) => {
                let err = ProbeError::ServiceUnresolvable(e.to_string());
                CheckResult::failed(CheckStatus::NotReady, "Services binding failed", &err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_when_all_core_services_bound() {
        let mut registry = ServiceRegistry::new();
        for service in CORE_SERVICES {
            registry.bind(service);
        }
        let result = ServicesProbe::new(Arc::new(registry)).check().await;

        assert_eq!(result.status, CheckStatus::Ready);
        assert_eq!(result.message, "Core services bound");
    }

    #[tokio::test]
    async fn names_the_unbound_service() {
        let mut registry = ServiceRegistry::new();
        registry.bind("db").bind("config");
        let result = ServicesProbe::new(Arc::new(registry)).check().await;

        assert_eq!(result.status, CheckStatus::NotReady);
        assert!(result.message.contains("service `cache` is not bound"));
        assert_eq!(result.metadata["error"], "service_unresolvable");
    }
}
