use super::Probe;
use crate::connectors::DatabaseConnector;
use crate::health::errors::ProbeError;
use crate::health::models::{CheckResult, CheckStatus};
use async_trait::async_trait;
use std::sync::Arc;

pub struct DatabaseProbe {
    db: Arc<dyn DatabaseConnector>,
}

impl DatabaseProbe {
    pub fn new(db: Arc<dyn DatabaseConnector>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Probe for DatabaseProbe {
    #[tracing::instrument(name = "Check database health", skip(self))]
    async fn check(&self) -> CheckResult {
        let connection = self.db.connection_name().to_string();

        match self.db.ping().await {
            Ok(()) => CheckResult::healthy("Database connection successful")
                .with_meta("connection", connection),
            Err(e) => {
                tracing::error!("Database health check failed: {:?}", e);
                let err = ProbeError::DependencyUnreachable(e.to_string());
                CheckResult::failed(CheckStatus::Unhealthy, "Database connection failed", &err)
                    .with_meta("connection", connection)
            }
        }
    }
}
