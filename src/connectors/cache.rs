use super::errors::ConnectorError;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Key-value cache used by the application.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Configured cache driver, e.g. `redis` or `memory`.
    fn driver(&self) -> &str;

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ConnectorError>;

    async fn get(&self, key: &str) -> Result<Option<String>, ConnectorError>;

    async fn forget(&self, key: &str) -> Result<(), ConnectorError>;
}

pub struct RedisCacheStore {
    client: redis::Client,
}

impl RedisCacheStore {
    pub fn new(redis_url: &str) -> Result<Self, ConnectorError> {
        let client = redis::Client::open(redis_url)
            .map_err(|err| ConnectorError::Internal(format!("Invalid Redis URL: {}", err)))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, ConnectorError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(ConnectorError::from)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn driver(&self) -> &str {
        "redis"
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ConnectorError> {
        let mut conn = self.connection().await?;
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        let (): () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ConnectorError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn forget(&self, key: &str) -> Result<(), ConnectorError> {
        let mut conn = self.connection().await?;
        let (): () = conn.del(key).await?;
        Ok(())
    }
}

/// In-process cache with per-entry expiry.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|(_, expires)| *expires > now).count()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn driver(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ConnectorError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ConnectorError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn forget(&self, key: &str) -> Result<(), ConnectorError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Stand-in for a cache that could not be built; every call fails with `reason`.
pub struct UnavailableCacheStore {
    driver: String,
    reason: String,
}

impl UnavailableCacheStore {
    pub fn new(driver: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            reason: reason.into(),
        }
    }

    fn failure(&self) -> ConnectorError {
        ConnectorError::ServiceUnavailable(self.reason.clone())
    }
}

#[async_trait]
impl CacheStore for UnavailableCacheStore {
    fn driver(&self) -> &str {
        &self.driver
    }

    async fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), ConnectorError> {
        Err(self.failure())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, ConnectorError> {
        Err(self.failure())
    }

    async fn forget(&self, _key: &str) -> Result<(), ConnectorError> {
        Err(self.failure())
    }
}

pub mod mock {
    use super::*;

    /// Cache double that accepts writes but hands back a different value.
    #[derive(Default)]
    pub struct CorruptingCache;

    #[async_trait]
    impl CacheStore for CorruptingCache {
        fn driver(&self) -> &str {
            "memory"
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), ConnectorError> {
            Ok(())
        }

        async fn get(&self, _key: &str) -> Result<Option<String>, ConnectorError> {
            Ok(Some("garbage".to_string()))
        }

        async fn forget(&self, _key: &str) -> Result<(), ConnectorError> {
            Ok(())
        }
    }
}
