use super::Probe;
use crate::connectors::{ConnectorError, Filesystem};
use crate::health::errors::ProbeError;
use crate::health::models::{CheckResult, CheckStatus};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

const PROBE_CONTENTS: &[u8] = b"health_check";

pub struct StorageProbe {
    fs: Arc<dyn Filesystem>,
    path: PathBuf,
}

impl StorageProbe {
    pub fn new(fs: Arc<dyn Filesystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    async fn write_read_delete(&self) -> Result<(), ProbeError> {
        if !self.fs.is_writable(&self.path).await {
            return Err(ProbeError::ResourceUnavailable(
                "Storage path not writable".to_string(),
            ));
        }

        let test_file = self
            .path
            .join(format!("health_check_{}.tmp", uuid::Uuid::new_v4().simple()));
        let unavailable = |e: ConnectorError| ProbeError::ResourceUnavailable(e.to_string());

        self.fs
            .write(&test_file, PROBE_CONTENTS)
            .await
            .map_err(unavailable)?;
        let contents = self.fs.read(&test_file).await.map_err(unavailable);
        let removed = self.fs.delete(&test_file).await.map_err(unavailable);

        if contents? != PROBE_CONTENTS {
            return Err(ProbeError::ResourceUnavailable(
                "File write/read test failed".to_string(),
            ));
        }
        removed
    }
}

#[async_trait]
impl Probe for StorageProbe {
    #[tracing::instrument(name = "Check storage health", skip(self))]
    async fn check(&self) -> CheckResult {
        let path = self.path.display().to_string();

        match self.write_read_delete().await {
            Ok(()) => CheckResult::healthy("Storage path is writable").with_meta("path", path),
            Err(err) => {
                tracing::error!("Storage health check failed: {:?}", err);
                CheckResult::failed(CheckStatus::Unhealthy, "Storage check failed", &err)
                    .with_meta("path", path)
            }
        }
    }
}
