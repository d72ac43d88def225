//! Descriptive information attached to health responses. Nothing here affects a verdict.

use crate::configuration::Settings;
use crate::helpers::format_bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use sysinfo::{Disks, System};

/// `rustc --version` of the compiler that built this binary.
pub const RUNTIME_VERSION: &str = env!("PODCHECK_RUSTC_VERSION");
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVER_SOFTWARE: &str = "actix-web/4";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnvironmentInfo {
    pub app_env: String,
    pub app_debug: bool,
    pub runtime_version: String,
    pub service_version: String,
    pub timezone: String,
}

impl EnvironmentInfo {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            app_env: settings.app.env.clone(),
            app_debug: settings.app.debug,
            runtime_version: RUNTIME_VERSION.to_string(),
            service_version: SERVICE_VERSION.to_string(),
            timezone: settings.app.timezone.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UptimeInfo {
    pub seconds: u64,
    pub human: String,
    pub started_at: String,
}

impl UptimeInfo {
    pub fn new(seconds: u64, started_at: DateTime<Utc>) -> Self {
        Self {
            seconds,
            human: format_duration(seconds),
            started_at: started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// `HH:MM:SS`; hours keep counting past a day.
pub fn format_duration(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryUsage {
    pub current: u64,
    #[serde(rename = "virtual")]
    pub virtual_bytes: u64,
    pub current_formatted: String,
    pub virtual_formatted: String,
}

impl MemoryUsage {
    fn new(current: u64, virtual_bytes: u64) -> Self {
        Self {
            current,
            virtual_bytes,
            current_formatted: format_bytes(current),
            virtual_formatted: format_bytes(virtual_bytes),
        }
    }

    pub fn of_current_process() -> Self {
        let mut sys = System::new();
        let usage = sysinfo::get_current_pid().ok().and_then(|pid| {
            sys.refresh_process(pid);
            sys.process(pid)
                .map(|process| (process.memory(), process.virtual_memory()))
        });

        match usage {
            Some((current, virtual_bytes)) => Self::new(current, virtual_bytes),
            None => {
                tracing::warn!("Unable to read memory usage of the current process");
                Self::new(0, 0)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DiskUsage {
    Measured {
        total: String,
        used: String,
        free: String,
        /// `None` when the filesystem reports zero capacity.
        percentage: Option<f64>,
    },
    Unavailable {
        error: String,
    },
}

impl DiskUsage {
    pub fn from_space(total: u64, free: u64) -> Self {
        let used = total.saturating_sub(free);
        let percentage = (total > 0)
            .then(|| ((used as f64 / total as f64) * 10_000.0).round() / 100.0);

        Self::Measured {
            total: format_bytes(total),
            used: format_bytes(used),
            free: format_bytes(free),
            percentage,
        }
    }

    /// Usage of the disk whose mount point holds `path`.
    pub fn of_path(path: &Path) -> Self {
        let path = match path.canonicalize() {
            Ok(path) => path,
            Err(err) => {
                return Self::Unavailable {
                    error: format!("Unable to get disk usage: {}", err),
                }
            }
        };

        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| Self::from_space(disk.total_space(), disk.available_space()))
            .unwrap_or_else(|| Self::Unavailable {
                error: format!(
                    "Unable to get disk usage: no disk mounted for {}",
                    path.display()
                ),
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub runtime_version: String,
    pub service_version: String,
    pub server_software: String,
    pub memory_usage: MemoryUsage,
    pub disk_usage: DiskUsage,
    pub server_time: String,
}

impl SystemInfo {
    /// Reads process and disk statistics; blocking.
    pub fn collect(base_path: &Path) -> Self {
        Self {
            runtime_version: RUNTIME_VERSION.to_string(),
            service_version: SERVICE_VERSION.to_string(),
            server_software: SERVER_SOFTWARE.to_string(),
            memory_usage: MemoryUsage::of_current_process(),
            disk_usage: DiskUsage::of_path(base_path),
            server_time: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn unavailable(error: &str) -> Self {
        Self {
            runtime_version: RUNTIME_VERSION.to_string(),
            service_version: SERVICE_VERSION.to_string(),
            server_software: SERVER_SOFTWARE.to_string(),
            memory_usage: MemoryUsage::new(0, 0),
            disk_usage: DiskUsage::Unavailable {
                error: format!("Unable to get disk usage: {}", error),
            },
            server_time: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GitInfo {
    pub branch: String,
    pub commit: String,
}

impl GitInfo {
    pub fn unknown() -> Self {
        Self {
            branch: "unknown".to_string(),
            commit: "unknown".to_string(),
        }
    }

    /// Reads `<base_path>/.git/HEAD`, following a symbolic ref to its commit.
    pub fn read(base_path: &Path) -> Self {
        let git_dir = base_path.join(".git");
        match std::fs::read_to_string(git_dir.join("HEAD")) {
            Ok(head) => Self::from_head(&head, |reference| resolve_ref(&git_dir, reference)),
            Err(_) => Self::unknown(),
        }
    }

    pub fn from_head(head: &str, resolve: impl Fn(&str) -> Option<String>) -> Self {
        let head = head.trim();
        let (branch, commit) = match head.strip_prefix("ref:") {
            Some(reference) => {
                let reference = reference.trim();
                let branch = reference.rsplit('/').next().unwrap_or(reference);
                (branch.to_string(), resolve(reference))
            }
            None => ("detached".to_string(), Some(head.to_string())),
        };

        let commit = commit
            .map(|c| c.trim().chars().take(8).collect::<String>())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Self { branch, commit }
    }
}

fn resolve_ref(git_dir: &Path, reference: &str) -> Option<String> {
    let loose: PathBuf = git_dir.join(reference);
    if let Ok(commit) = std::fs::read_to_string(loose) {
        return Some(commit);
    }

    // refs moved by `git gc` live in packed-refs as "<sha> <ref>"
    let packed = std::fs::read_to_string(git_dir.join("packed-refs")).ok()?;
    packed
        .lines()
        .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
        .find_map(|line| {
            let (sha, name) = line.split_once(' ')?;
            (name.trim() == reference).then(|| sha.to_string())
        })
}

/// Service identity shared by every health response.
#[derive(Debug, Clone)]
pub struct ServiceIdentity {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub pod: String,
}

impl ServiceIdentity {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            service: settings.app.name.clone(),
            version: settings.app.version.clone(),
            environment: settings.app.env.clone(),
            pod: pod_name(),
        }
    }
}

pub fn pod_name() -> String {
    System::host_name()
        .or_else(|| std::env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_version_names_the_compiler() {
        assert!(RUNTIME_VERSION.starts_with("rustc "), "{}", RUNTIME_VERSION);
        assert_ne!(RUNTIME_VERSION, env!("CARGO_PKG_RUST_VERSION"));
        assert_eq!(
            EnvironmentInfo::from_settings(&crate::configuration::tests::test_settings())
                .runtime_version,
            RUNTIME_VERSION
        );
    }

    #[test]
    fn duration_keeps_counting_hours() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(3_725), "01:02:05");
        assert_eq!(format_duration(90_061), "25:01:01");
    }

    #[test]
    fn disk_usage_percentage() {
        let usage = DiskUsage::from_space(1024 * 1024, 256 * 1024);
        assert_eq!(
            usage,
            DiskUsage::Measured {
                total: "1 MB".to_string(),
                used: "768 KB".to_string(),
                free: "256 KB".to_string(),
                percentage: Some(75.0),
            }
        );
    }

    #[test]
    fn zero_capacity_disk_has_no_percentage() {
        let usage = DiskUsage::from_space(0, 0);
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["total"], "0 B");
        assert!(json["percentage"].is_null());
    }

    #[test]
    fn unavailable_disk_serializes_error() {
        let usage = DiskUsage::of_path(Path::new("/definitely/not/here"));
        let json = serde_json::to_value(&usage).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Unable to get disk usage"));
    }

    #[test]
    fn head_on_branch_resolves_commit() {
        let git = GitInfo::from_head("ref: refs/heads/feature/probes\n", |reference| {
            assert_eq!(reference, "refs/heads/feature/probes");
            Some("0123456789abcdef\n".to_string())
        });
        assert_eq!(
            git,
            GitInfo {
                branch: "probes".to_string(),
                commit: "01234567".to_string(),
            }
        );
    }

    #[test]
    fn detached_head() {
        let git = GitInfo::from_head("fedcba9876543210", |_| None);
        assert_eq!(git.branch, "detached");
        assert_eq!(git.commit, "fedcba98");
    }

    #[test]
    fn unresolved_ref_is_unknown_commit() {
        let git = GitInfo::from_head("ref: refs/heads/main", |_| None);
        assert_eq!(git.branch, "main");
        assert_eq!(git.commit, "unknown");
    }

    #[test]
    fn reads_packed_refs() {
        let dir = tempfile::tempdir().unwrap();
        let git_dir = dir.path().join(".git");
        std::fs::create_dir_all(&git_dir).unwrap();
        std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        std::fs::write(
            git_dir.join("packed-refs"),
            "# pack-refs with: peeled fully-peeled sorted\naaaabbbbccccdddd refs/heads/main\n",
        )
        .unwrap();

        let git = GitInfo::read(dir.path());
        assert_eq!(git.branch, "main");
        assert_eq!(git.commit, "aaaabbbb");
    }

    #[test]
    fn missing_repository_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(GitInfo::read(dir.path()), GitInfo::unknown());
    }
}
