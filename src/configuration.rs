use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::path::PathBuf;
use std::time::Duration;

/// Store name that selects Redis as backing store for cache, session or queue.
pub const REDIS_DRIVER: &str = "redis";
/// In-process store, the default for cache, session and queue.
pub const MEMORY_DRIVER: &str = "memory";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: StoreSettings,
    #[serde(default)]
    pub session: StoreSettings,
    #[serde(default)]
    pub queue: StoreSettings,
    #[serde(default)]
    pub redis: RedisSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub health: HealthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Application secret. Left empty when unset so the startup probe can report it.
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_app_env")]
    pub env: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub host: String,
    pub port: u16,
    /// Project root, used to locate `.git` and to measure disk usage.
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection name reported by the database probe.
    #[serde(default = "default_connection")]
    pub connection: String,
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    /// Upper bound for one connect-and-ping attempt.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub driver: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthSettings {
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

/// Which stores rely on Redis. Resolved once from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedisUsage {
    pub cache: bool,
    pub session: bool,
    pub queue: bool,
}

impl RedisUsage {
    pub fn is_used(&self) -> bool {
        self.cache || self.session || self.queue
    }

    pub fn stores(&self) -> Vec<&'static str> {
        [
            (self.cache, "cache"),
            (self.session, "session"),
            (self.queue, "queue"),
        ]
        .into_iter()
        .filter_map(|(used, name)| used.then_some(name))
        .collect()
    }
}

impl Settings {
    pub fn redis_usage(&self) -> RedisUsage {
        RedisUsage {
            cache: self.cache.driver == REDIS_DRIVER,
            session: self.session.driver == REDIS_DRIVER,
            queue: self.queue.driver == REDIS_DRIVER,
        }
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database_name)
            .ssl_mode(PgSslMode::Disable)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl HealthSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            driver: MEMORY_DRIVER.to_string(),
        }
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1/".to_string(),
        }
    }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_app_name() -> String {
    "podcheck".to_string()
}

fn default_app_env() -> String {
    "production".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_base_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_connection() -> String {
    "pgsql".to_string()
}

fn default_connect_timeout() -> u64 {
    2
}

fn default_probe_timeout() -> u64 {
    3000
}

fn default_cache_ttl() -> u64 {
    10
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // `configuration.yaml` is optional, PODCHECK__APP__PORT=8080 overrides app.port
    config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("PODCHECK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_settings() -> Settings {
        Settings {
            app: AppSettings {
                name: "podcheck-test".to_string(),
                key: "base64:c2VjcmV0".to_string(),
                env: "testing".to_string(),
                debug: true,
                timezone: "UTC".to_string(),
                version: "1.0.0".to_string(),
                host: "127.0.0.1".to_string(),
                port: 0,
                base_path: PathBuf::from("."),
            },
            database: DatabaseSettings {
                connection: "pgsql".to_string(),
                username: "postgres".to_string(),
                password: "postgres".to_string(),
                host: "127.0.0.1".to_string(),
                port: 5432,
                database_name: "podcheck".to_string(),
                connect_timeout_secs: 1,
            },
            cache: StoreSettings::default(),
            session: StoreSettings::default(),
            queue: StoreSettings::default(),
            redis: RedisSettings::default(),
            storage: StorageSettings {
                path: std::env::temp_dir(),
            },
            health: HealthSettings::default(),
        }
    }

    #[test]
    fn redis_usage_is_off_when_no_store_selects_it() {
        let settings = test_settings();
        let usage = settings.redis_usage();
        assert!(!usage.is_used());
        assert!(usage.stores().is_empty());
    }

    #[test]
    fn redis_usage_tracks_each_store() {
        let mut settings = test_settings();
        settings.session.driver = "redis".to_string();
        settings.queue.driver = "redis".to_string();

        let usage = settings.redis_usage();
        assert!(usage.is_used());
        assert!(!usage.cache);
        assert_eq!(usage.stores(), vec!["session", "queue"]);
    }

    #[test]
    fn connect_options_use_configured_parts() {
        let settings = test_settings();
        let options = settings.database.connect_options();
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("podcheck"));
        assert_eq!(settings.database.connect_timeout(), Duration::from_secs(1));
    }
}
