use super::Probe;
use crate::configuration::RedisUsage;
use crate::connectors::BrokerClient;
use crate::health::errors::ProbeError;
use crate::health::models::{CheckResult, CheckStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// Secondary cache / broker probe. Skips without a network call when Redis backs
/// none of the cache, session or queue stores.
pub struct RedisProbe {
    broker: Option<Arc<dyn BrokerClient>>,
    usage: RedisUsage,
}

impl RedisProbe {
    /// `broker` is only consulted when `usage` says Redis is in use.
    pub fn new(broker: Option<Arc<dyn BrokerClient>>, usage: RedisUsage) -> Self {
        Self { broker, usage }
    }
}

#[async_trait]
impl Probe for RedisProbe {
    #[tracing::instrument(name = "Check Redis health", skip(self))]
    async fn check(&self) -> CheckResult {
        let broker = match (&self.broker, self.usage.is_used()) {
            (Some(broker), true) => broker,
            _ => return CheckResult::skipped("Redis not configured"),
        };

        match broker.ping().await {
            Ok(()) => CheckResult::healthy("Redis connection successful")
                .with_meta("used_by", self.usage.stores()),
            Err(e) => {
                tracing::warn!("Redis PING failed: {:?}", e);
                let err = ProbeError::DependencyUnreachable(e.to_string());
                CheckResult::failed(CheckStatus::Unhealthy, "Redis connection failed", &err)
                    .with_meta("used_by", self.usage.stores())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::broker::mock::MockBroker;

    fn session_only() -> RedisUsage {
        RedisUsage {
            session: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn skipped_when_redis_is_not_used() {
        // a broker that is down must not be contacted
        let probe = RedisProbe::new(
            Some(Arc::new(MockBroker::down("unreachable"))),
            RedisUsage::default(),
        );
        let result = probe.check().await;

        assert_eq!(result.status, CheckStatus::Skipped);
        assert_eq!(result.message, "Redis not configured");
    }

    #[tokio::test]
    async fn skipped_without_client() {
        let probe = RedisProbe::new(None, session_only());
        assert_eq!(probe.check().await.status, CheckStatus::Skipped);
    }

    #[tokio::test]
    async fn healthy_when_ping_answers() {
        let probe = RedisProbe::new(Some(Arc::new(MockBroker::up())), session_only());
        let result = probe.check().await;

        assert_eq!(result.status, CheckStatus::Healthy);
        assert_eq!(result.metadata["used_by"], serde_json::json!(["session"]));
    }

    #[tokio::test]
    async fn unhealthy_when_configured_but_down() {
        let probe = RedisProbe::new(
            Some(Arc::new(MockBroker::down("Connection reset by peer"))),
            session_only(),
        );
        let result = probe.check().await;

        assert_eq!(result.status, CheckStatus::Unhealthy);
        assert!(result.message.starts_with("Redis connection failed: "));
        assert!(result.message.contains("Connection reset by peer"));
    }
}
