use super::Probe;
use crate::connectors::CacheStore;
use crate::health::errors::ProbeError;
use crate::health::models::{CheckResult, CheckStatus};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub struct CacheProbe {
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CacheProbe {
    pub fn new(cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Unique per invocation so concurrent checks never read each other's value.
    fn test_key() -> String {
        format!(
            "health_check_{}_{}",
            chrono::Utc::now().timestamp(),
            uuid::Uuid::new_v4().simple()
        )
    }

    async fn round_trip(&self) -> Result<(), ProbeError> {
        let key = Self::test_key();
        let value = format!("test_{}", chrono::Utc::now().timestamp());
        let unreachable = |e: crate::connectors::ConnectorError| {
            ProbeError::DependencyUnreachable(e.to_string())
        };

        self.cache.put(&key, &value, self.ttl).await.map_err(unreachable)?;
        let retrieved = self.cache.get(&key).await.map_err(unreachable)?;
        self.cache.forget(&key).await.map_err(unreachable)?;

        if retrieved.as_deref() == Some(value.as_str()) {
            Ok(())
        } else {
            Err(ProbeError::DependencyMisbehaving(
                "Cache test failed - value mismatch".to_string(),
            ))
        }
    }
}

#[async_trait]
impl Probe for CacheProbe {
    #[tracing::instrument(name = "Check cache health", skip(self))]
    async fn check(&self) -> CheckResult {
        let driver = self.cache.driver().to_string();

        match self.round_trip().await {
            Ok(()) => CheckResult::healthy("Cache system working").with_meta("driver", driver),
            Err(err) => {
                tracing::error!("Cache health check failed: {:?}", err);
                CheckResult::failed(CheckStatus::Unhealthy, "Cache system failed", &err)
                    .with_meta("driver", driver)
            }
        }
    }
}
