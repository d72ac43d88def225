use super::info::EnvironmentInfo;
use super::models::{CheckStatus, OverallStatus};
use super::probes::{
    CacheProbe, ConfigProbe, DatabaseProbe, Probe, RedisProbe, RoutesProbe, ServicesProbe,
    StorageProbe,
};
use crate::configuration::Settings;
use crate::connectors::{BrokerClient, CacheStore, DatabaseConnector, Filesystem, ServiceRegistry};
use std::sync::Arc;

/// Composite endpoint a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckGroup {
    Readiness,
    Startup,
}

impl CheckGroup {
    /// Status every required check must report for the group to pass.
    pub fn passing_status(self) -> CheckStatus {
        match self {
            Self::Readiness => CheckStatus::Healthy,
            Self::Startup => CheckStatus::Ready,
        }
    }

    /// Status given to a check that failed, timed out or aborted.
    pub fn failure_status(self) -> CheckStatus {
        match self {
            Self::Readiness => CheckStatus::Unhealthy,
            Self::Startup => CheckStatus::NotReady,
        }
    }

    pub fn verdict(self, passed: bool) -> OverallStatus {
        match (self, passed) {
            (Self::Readiness, true) => OverallStatus::Ready,
            (Self::Readiness, false) => OverallStatus::NotReady,
            (Self::Startup, true) => OverallStatus::Started,
            (Self::Startup, false) => OverallStatus::Starting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Must report the group's passing status.
    Required,
    /// Blocks the group only when it reports the failure status.
    Optional,
}

#[derive(Clone)]
pub struct RegisteredCheck {
    pub name: String,
    pub requirement: Requirement,
    pub probe: Arc<dyn Probe>,
}

/// Collaborators the standard check set is built from.
pub struct Dependencies {
    pub settings: Arc<Settings>,
    pub database: Arc<dyn DatabaseConnector>,
    pub cache: Arc<dyn CacheStore>,
    /// `None` when Redis backs none of cache, session or queue.
    pub broker: Option<Arc<dyn BrokerClient>>,
    pub filesystem: Arc<dyn Filesystem>,
    pub services: Arc<ServiceRegistry>,
}

/// Ordered check name → probe mapping, per group.
pub struct CheckRegistry {
    readiness: Vec<RegisteredCheck>,
    startup: Vec<RegisteredCheck>,
    environment: EnvironmentInfo,
}

impl CheckRegistry {
    pub fn new(environment: EnvironmentInfo) -> Self {
        Self {
            readiness: Vec::new(),
            startup: Vec::new(),
            environment,
        }
    }

    /// The check set served by `/health/ready` and `/health/startup`.
    pub fn standard(deps: Dependencies) -> Self {
        let settings = deps.settings;
        let mut registry = Self::new(EnvironmentInfo::from_settings(&settings));

        registry
            .register(
                CheckGroup::Readiness,
                "database",
                Requirement::Required,
                Arc::new(DatabaseProbe::new(deps.database)),
            )
            .register(
                CheckGroup::Readiness,
                "cache",
                Requirement::Required,
                Arc::new(CacheProbe::new(deps.cache, settings.health.cache_ttl())),
            )
            .register(
                CheckGroup::Readiness,
                "redis",
                Requirement::Optional,
                Arc::new(RedisProbe::new(deps.broker, settings.redis_usage())),
            )
            .register(
                CheckGroup::Readiness,
                "storage",
                Requirement::Required,
                Arc::new(StorageProbe::new(
                    deps.filesystem,
                    settings.storage.path.clone(),
                )),
            )
            .register(
                CheckGroup::Startup,
                "config",
                Requirement::Required,
                Arc::new(ConfigProbe::new(settings.clone())),
            )
            .register(
                CheckGroup::Startup,
                "routes",
                Requirement::Required,
                Arc::new(RoutesProbe::new(deps.services.clone())),
            )
            .register(
                CheckGroup::Startup,
                "services",
                Requirement::Required,
                Arc::new(ServicesProbe::new(deps.services)),
            );

        registry
    }

    /// Appends a check to `group`. A name already present is replaced in place.
    pub fn register(
        &mut self,
        group: CheckGroup,
        name: &str,
        requirement: Requirement,
        probe: Arc<dyn Probe>,
    ) -> &mut Self {
        let check = RegisteredCheck {
            name: name.to_string(),
            requirement,
            probe,
        };
        let checks = self.group_mut(group);

        match checks.iter().position(|existing| existing.name == name) {
            Some(index) => {
                tracing::warn!(check = name, ?group, "Replacing registered health check");
                checks[index] = check;
            }
            None => checks.push(check),
        }
        self
    }

    pub fn checks(&self, group: CheckGroup) -> &[RegisteredCheck] {
        match group {
            CheckGroup::Readiness => &self.readiness,
            CheckGroup::Startup => &self.startup,
        }
    }

    pub fn environment(&self) -> &EnvironmentInfo {
        &self.environment
    }

    fn group_mut(&mut self, group: CheckGroup) -> &mut Vec<RegisteredCheck> {
        match group {
            CheckGroup::Readiness => &mut self.readiness,
            CheckGroup::Startup => &mut self.startup,
        }
    }
}
