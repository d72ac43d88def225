use super::errors::ProbeError;
use super::info::{EnvironmentInfo, ServiceIdentity, UptimeInfo};
use super::models::{CheckResult, OverallStatus, Verdict};
use super::registry::{CheckGroup, CheckRegistry, RegisteredCheck, Requirement};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::time::timeout;

pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Runs the registered probes of a group and folds their results into a verdict.
pub struct HealthChecker {
    registry: CheckRegistry,
    identity: ServiceIdentity,
    check_timeout: Duration,
    start_time: Instant,
    started_at: DateTime<Utc>,
}

impl HealthChecker {
    pub fn new(registry: CheckRegistry, identity: ServiceIdentity) -> Self {
        Self {
            registry,
            identity,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn with_check_timeout(mut self, check_timeout: Duration) -> Self {
        self.check_timeout = check_timeout;
        self
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn environment(&self) -> &EnvironmentInfo {
        self.registry.environment()
    }

    pub fn uptime(&self) -> UptimeInfo {
        UptimeInfo::new(self.start_time.elapsed().as_secs(), self.started_at)
    }

    /// Liveness never looks at dependencies.
    pub fn liveness(&self) -> Verdict {
        Verdict::new(OverallStatus::Alive)
    }

    /// General health is descriptive only.
    pub fn general(&self) -> Verdict {
        Verdict::new(OverallStatus::Healthy)
    }

    #[tracing::instrument(name = "Evaluate health checks", skip(self))]
    pub async fn evaluate(&self, group: CheckGroup) -> Verdict {
        let checks = self.registry.checks(group);
        let results =
            futures::future::join_all(checks.iter().map(|check| self.run_isolated(group, check)))
                .await;

        let status = fold(
            group,
            checks
                .iter()
                .zip(results.iter())
                .map(|(check, result)| (check.requirement, result)),
        );

        let mut verdict = Verdict::new(status);
        for (check, result) in checks.iter().zip(results) {
            verdict.checks.insert(check.name.clone(), result);
        }

        if !verdict.is_passing() {
            let failing: Vec<&str> = verdict
                .checks
                .iter()
                .filter(|(_, result)| result.status == group.failure_status())
                .map(|(name, _)| name.as_str())
                .collect();
            tracing::warn!(?group, ?failing, status = ?verdict.status, "Health checks failing");
        }

        verdict
    }

    /// One probe, bounded by the check timeout; a panic becomes a failing result.
    async fn run_isolated(&self, group: CheckGroup, check: &RegisteredCheck) -> CheckResult {
        let outcome = AssertUnwindSafe(check.probe.check()).catch_unwind();

        match timeout(self.check_timeout, outcome).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                tracing::error!(check = %check.name, "Health check panicked");
                CheckResult::failed(group.failure_status(), "Check aborted", &ProbeError::Aborted)
            }
            Err(_) => {
                tracing::error!(check = %check.name, "Health check timed out");
                CheckResult::failed(
                    group.failure_status(),
                    "Check timed out",
                    &ProbeError::Timeout(self.check_timeout),
                )
            }
        }
    }
}

/// Required checks must report the group's passing status; optional checks only
/// fail the group when they report its failure status (`skipped` never does).
pub fn fold<'a>(
    group: CheckGroup,
    results: impl IntoIterator<Item = (Requirement, &'a CheckResult)>,
) -> OverallStatus {
    let passed = results
        .into_iter()
        .all(|(requirement, result)| match requirement {
            Requirement::Required => result.status == group.passing_status(),
            Requirement::Optional => result.status != group.failure_status(),
        });

    group.verdict(passed)
}
