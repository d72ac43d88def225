mod checks;
mod errors;
pub mod info;
mod models;
pub mod probes;
mod registry;

pub use checks::{fold, HealthChecker, DEFAULT_CHECK_TIMEOUT};
pub use errors::ProbeError;
pub use info::{EnvironmentInfo, GitInfo, ServiceIdentity, SystemInfo, UptimeInfo};
pub use models::{CheckResult, CheckStatus, OverallStatus, Verdict};
pub use probes::Probe;
pub use registry::{CheckGroup, CheckRegistry, Dependencies, RegisteredCheck, Requirement};
