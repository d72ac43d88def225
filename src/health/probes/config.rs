use super::Probe;
use crate::configuration::Settings;
use crate::health::errors::ProbeError;
use crate::health::models::{CheckResult, CheckStatus};
use async_trait::async_trait;
use std::sync::Arc;

pub struct ConfigProbe {
    settings: Arc<Settings>,
}

impl ConfigProbe {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    fn missing_keys(&self) -> Vec<&'static str> {
        [
            ("app.name", &self.settings.app.name),
            ("app.key", &self.settings.app.key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect()
    }
}

#[async_trait]
impl Probe for ConfigProbe {
    async fn check(&self) -> CheckResult {
        let missing = self.missing_keys();
        if missing.is_empty() {
            return CheckResult::ready("Application config loaded");
        }

        let err = ProbeError::ConfigurationMissing(format!(
            "Missing required configuration: {}",
            missing.join(", ")
        ));
        tracing::warn!("Startup config check failed: {}", err);
        CheckResult::failed(CheckStatus::NotReady, "Config loading failed", &err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::tests::test_settings;

    #[tokio::test]
    async fn ready_when_name_and_key_are_set() {
        let probe = ConfigProbe::new(Arc::new(test_settings()));
        let result = probe.check().await;

        assert_eq!(result.status, CheckStatus::Ready);
        assert_eq!(result.message, "Application config loaded");
    }

    #[tokio::test]
    async fn not_ready_lists_missing_keys() {
        let mut settings = test_settings();
        settings.app.key = String::new();
        settings.app.name = " ".to_string();
        let result = ConfigProbe::new(Arc::new(settings)).check().await;

        assert_eq!(result.status, CheckStatus::NotReady);
        assert_eq!(
            result.message,
            "Config loading failed: Missing required configuration: app.name, app.key"
        );
        assert_eq!(result.metadata["error"], "configuration_missing");
    }
}
