use podcheck::configuration::Settings;
use serde_json::json;
use std::net::TcpListener;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    // dropped with the app, removing the storage directory
    _storage: TempDir,
}

/// Settings for a pod whose database is unreachable and whose stores are in memory.
pub fn test_configuration(storage: &TempDir) -> Settings {
    serde_json::from_value(json!({
        "app": {
            "name": "podcheck-it",
            "key": "base64:aW50ZWdyYXRpb24=",
            "env": "testing",
            "host": "127.0.0.1",
            "port": 0,
            "base_path": storage.path(),
        },
        "database": {
            "username": "postgres",
            "password": "postgres",
            "host": "127.0.0.1",
            "port": 1,
            "database_name": "podcheck",
            "connect_timeout_secs": 1,
        },
        "storage": { "path": storage.path() },
        "health": { "probe_timeout_ms": 2000 },
    }))
    .expect("Failed to build test configuration")
}

pub async fn spawn_app_with_configuration(configuration: Settings, storage: TempDir) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = podcheck::startup::run(listener, configuration)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        _storage: storage,
    }
}

pub async fn spawn_app() -> TestApp {
    let storage = tempfile::tempdir().expect("Failed to create storage directory");
    let configuration = test_configuration(&storage);
    spawn_app_with_configuration(configuration, storage).await
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
