use super::errors::ConnectorError;
use async_trait::async_trait;

/// Ping-capable broker backing cache, session or queue stores.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    async fn ping(&self) -> Result<(), ConnectorError>;
}

pub struct RedisBroker {
    client: redis::Client,
}

impl RedisBroker {
    pub fn new(redis_url: &str) -> Result<Self, ConnectorError> {
        let client = redis::Client::open(redis_url)
            .map_err(|err| ConnectorError::Internal(format!("Invalid Redis URL: {}", err)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BrokerClient for RedisBroker {
    async fn ping(&self) -> Result<(), ConnectorError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;

        if pong.eq_ignore_ascii_case("PONG") {
            Ok(())
        } else {
            Err(ConnectorError::InvalidResponse(format!(
                "unexpected PING reply: {}",
                pong
            )))
        }
    }
}

pub mod mock {
    use super::*;

    pub struct MockBroker {
        pub failure: Option<ConnectorError>,
    }

    impl MockBroker {
        pub fn up() -> Self {
            Self { failure: None }
        }

        pub fn down(reason: &str) -> Self {
            Self {
                failure: Some(ConnectorError::ServiceUnavailable(reason.to_string())),
            }
        }
    }

    #[async_trait]
    impl BrokerClient for MockBroker {
        async fn ping(&self) -> Result<(), ConnectorError> {
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }
}
