use super::errors::ConnectorError;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use std::time::Duration;

#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Configured connection name, e.g. `pgsql`.
    fn connection_name(&self) -> &str;

    /// Opens one connection and checks it is alive. Single attempt.
    async fn ping(&self) -> Result<(), ConnectorError>;
}

/// Postgres reached through a fresh connection per ping, so a failure carries the
/// driver's own error text instead of a pool timeout.
pub struct PgDatabase {
    options: PgConnectOptions,
    connect_timeout: Duration,
    connection_name: String,
}

impl PgDatabase {
    pub fn new(
        options: PgConnectOptions,
        connect_timeout: Duration,
        connection_name: impl Into<String>,
    ) -> Self {
        Self {
            options,
            connect_timeout,
            connection_name: connection_name.into(),
        }
    }

    async fn connect_and_ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = PgConnection::connect_with(&self.options).await?;
        conn.ping().await?;
        conn.close().await
    }
}

#[async_trait]
impl DatabaseConnector for PgDatabase {
    fn connection_name(&self) -> &str {
        &self.connection_name
    }

    async fn ping(&self) -> Result<(), ConnectorError> {
        match tokio::time::timeout(self.connect_timeout, self.connect_and_ping()).await {
            Ok(result) => result.map_err(ConnectorError::from),
            Err(_) => Err(ConnectorError::ServiceUnavailable(format!(
                "no answer within {}ms",
                self.connect_timeout.as_millis()
            ))),
        }
    }
}

pub mod mock {
    use super::*;

    /// Database double that either answers the ping or fails with the given error.
    pub struct MockDatabase {
        pub connection_name: String,
        pub failure: Option<ConnectorError>,
    }

    impl MockDatabase {
        pub fn up() -> Self {
            Self {
                connection_name: "pgsql".to_string(),
                failure: None,
            }
        }

        pub fn down(reason: &str) -> Self {
            Self {
                connection_name: "pgsql".to_string(),
                failure: Some(ConnectorError::ServiceUnavailable(reason.to_string())),
            }
        }
    }

    #[async_trait]
    impl DatabaseConnector for MockDatabase {
        fn connection_name(&self) -> &str {
            &self.connection_name
        }

        async fn ping(&self) -> Result<(), ConnectorError> {
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn closed_port() -> PgConnectOptions {
        PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("postgres")
            .password("postgres")
            .database("podcheck")
    }

    #[tokio::test]
    async fn refused_connection_reports_the_cause_at_once() {
        let db = PgDatabase::new(closed_port(), Duration::from_secs(5), "pgsql");

        let started = Instant::now();
        let err = db.ping().await.unwrap_err();

        assert!(matches!(err, ConnectorError::ServiceUnavailable(_)));
        assert!(err.to_string().to_lowercase().contains("refused"), "{}", err);
        // one attempt, no reconnect loop until the deadline
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn mock_reports_configured_failure() {
        let db = mock::MockDatabase::down("password authentication failed");
        assert_eq!(db.connection_name(), "pgsql");
        assert_eq!(
            db.ping().await.unwrap_err(),
            ConnectorError::ServiceUnavailable("password authentication failed".to_string())
        );
    }
}
