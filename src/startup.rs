use crate::configuration::{Settings, MEMORY_DRIVER, REDIS_DRIVER};
use crate::connectors::{
    BrokerClient, CacheStore, ConnectorError, LocalFilesystem, MemoryCacheStore, PgDatabase,
    RedisBroker, RedisCacheStore, ServiceRegistry, UnavailableCacheStore,
};
use crate::health::{CheckRegistry, Dependencies, HealthChecker, ServiceIdentity};
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

fn io_error<E>(err: E) -> std::io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    std::io::Error::new(std::io::ErrorKind::Other, err)
}

fn cache_store(settings: &Settings) -> Result<Arc<dyn CacheStore>, ConnectorError> {
    match settings.cache.driver.as_str() {
        REDIS_DRIVER => Ok(Arc::new(RedisCacheStore::new(&settings.redis.url)?)),
        MEMORY_DRIVER => Ok(Arc::new(MemoryCacheStore::new())),
        other => Err(ConnectorError::Internal(format!(
            "unsupported cache driver `{}`",
            other
        ))),
    }
}

/// Wires the real connectors into a checker. Nothing here touches the network.
///
/// A service is bound in the registry only once its connector is built, so a cache
/// that cannot be constructed leaves `cache` unbound and fails the startup check.
pub fn build_health_checker(settings: Settings) -> Result<HealthChecker, std::io::Error> {
    let mut services = ServiceRegistry::new();
    routes::register_routes(&mut services);
    services.bind("config");

    let database = Arc::new(PgDatabase::new(
        settings.database.connect_options(),
        settings.database.connect_timeout(),
        settings.database.connection.clone(),
    ));
    services.bind("db");

    let cache = match cache_store(&settings) {
        Ok(cache) => {
            services.bind("cache");
            cache
        }
        Err(err) => {
            tracing::error!(driver = %settings.cache.driver, "Cache store unavailable: {}", err);
            Arc::new(UnavailableCacheStore::new(
                settings.cache.driver.clone(),
                err.to_string(),
            )) as Arc<dyn CacheStore>
        }
    };

    let broker: Option<Arc<dyn BrokerClient>> = if settings.redis_usage().is_used() {
        Some(Arc::new(
            RedisBroker::new(&settings.redis.url).map_err(io_error)?,
        ))
    } else {
        None
    };

    let check_timeout = settings.health.probe_timeout();
    let settings = Arc::new(settings);
    let registry = CheckRegistry::standard(Dependencies {
        settings: settings.clone(),
        database,
        cache,
        broker,
        filesystem: Arc::new(LocalFilesystem),
        services: Arc::new(services),
    });

    Ok(
        HealthChecker::new(registry, ServiceIdentity::from_settings(&settings))
            .with_check_timeout(check_timeout),
    )
}

pub async fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let health_checker = web::Data::new(build_health_checker(settings.clone())?);
    let settings = web::Data::new(settings);

    tracing::info!(
        service = %health_checker.identity().service,
        pod = %health_checker.identity().pod,
        "Health endpoints mounted under {}",
        routes::HEALTH_SCOPE
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(health_checker.clone())
            .app_data(settings.clone())
            .configure(routes::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::tests::test_settings;
    use crate::health::{CheckGroup, CheckStatus, OverallStatus};

    #[tokio::test]
    async fn startup_passes_with_every_connector_built() {
        let checker = build_health_checker(test_settings()).unwrap();
        let verdict = checker.evaluate(CheckGroup::Startup).await;

        assert_eq!(verdict.status, OverallStatus::Started);
        assert_eq!(verdict.checks["routes"].message, "Routes loaded (4 routes)");
        assert_eq!(verdict.checks["services"].status, CheckStatus::Ready);
    }

    #[tokio::test]
    async fn unknown_cache_driver_leaves_cache_unbound() {
        let mut settings = test_settings();
        settings.cache.driver = "memcached".to_string();

        let checker = build_health_checker(settings).unwrap();
        let verdict = checker.evaluate(CheckGroup::Startup).await;

        assert_eq!(verdict.status, OverallStatus::Starting);
        assert_eq!(verdict.checks["services"].status, CheckStatus::NotReady);
        assert!(verdict.checks["services"]
            .message
            .contains("service `cache` is not bound"));
        assert_eq!(verdict.checks["config"].status, CheckStatus::Ready);
    }

    #[test]
    fn malformed_redis_url_is_a_startup_error() {
        let mut settings = test_settings();
        settings.session.driver = REDIS_DRIVER.to_string();
        settings.redis.url = "not a url".to_string();

        assert!(build_health_checker(settings).is_err());
    }
}
