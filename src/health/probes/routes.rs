use super::Probe;
use crate::connectors::ServiceRegistry;
use crate::health::errors::ProbeError;
use crate::health::models::{CheckResult, CheckStatus};
use async_trait::async_trait;
use std::sync::Arc;

pub struct RoutesProbe {
    registry: Arc<ServiceRegistry>,
}

impl RoutesProbe {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Probe for RoutesProbe {
    async fn check(&self) -> CheckResult {
        let count = self.registry.route_count();
        if count > 0 {
            return CheckResult::ready(format!("Routes loaded ({} routes)", count))
                .with_meta("count", count);
        }

        let err = ProbeError::ResourceUnavailable("route table is empty".to_string());
        CheckResult::failed(CheckStatus::NotReady, "Routes loading failed", &err)
            .with_meta("count", count)
    }
}
