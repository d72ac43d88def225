use crate::configuration::Settings;
use crate::connectors::ServiceRegistry;
use crate::health::{
    CheckGroup, CheckResult, EnvironmentInfo, GitInfo, HealthChecker, OverallStatus,
    SystemInfo, UptimeInfo, Verdict,
};
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, Route};
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

pub const HEALTH_SCOPE: &str = "/health";

/// Every health endpoint, relative to [`HEALTH_SCOPE`]. All of them answer GET only.
fn health_routes() -> [(&'static str, Route); 4] {
    [
        ("", web::get().to(health_handler)),
        ("/live", web::get().to(live_handler)),
        ("/ready", web::get().to(ready_handler)),
        ("/startup", web::get().to(startup_handler)),
    ]
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = health_routes()
        .into_iter()
        .fold(web::scope(HEALTH_SCOPE), |scope, (path, route)| {
            scope.route(path, route)
        });
    cfg.service(scope);
}

/// Records the routes [`configure`] mounts, for the startup route-table check.
pub fn register_routes(services: &mut ServiceRegistry) {
    for (path, _) in health_routes() {
        services.register_route("GET", format!("{}{}", HEALTH_SCOPE, path));
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum CheckEntry<'a> {
    Check(&'a CheckResult),
    Info(&'a EnvironmentInfo),
}

#[derive(Serialize)]
struct ProbeResponse<'a> {
    status: OverallStatus,
    timestamp: String,
    service: &'a str,
    pod: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<IndexMap<&'a str, CheckEntry<'a>>>,
}

#[derive(Serialize)]
struct GeneralResponse<'a> {
    status: OverallStatus,
    timestamp: String,
    service: &'a str,
    version: &'a str,
    environment: &'a str,
    pod: &'a str,
    uptime: UptimeInfo,
    system: SystemInfo,
    git: GitInfo,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn status_code(verdict: &Verdict) -> StatusCode {
    if verdict.is_passing() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

fn respond<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(body)
}

fn probe_response<'a>(
    checker: &'a HealthChecker,
    verdict: &'a Verdict,
    environment: Option<&'a EnvironmentInfo>,
) -> HttpResponse {
    let identity = checker.identity();
    let checks = (!verdict.checks.is_empty() || environment.is_some()).then(|| {
        let mut checks: IndexMap<&str, CheckEntry> = verdict
            .checks
            .iter()
            .map(|(name, result)| (name.as_str(), CheckEntry::Check(result)))
            .collect();
        if let Some(environment) = environment {
            checks.insert("environment", CheckEntry::Info(environment));
        }
        checks
    });

    respond(
        status_code(verdict),
        &ProbeResponse {
            status: verdict.status,
            timestamp: timestamp(),
            service: &identity.service,
            pod: &identity.pod,
            checks,
        },
    )
}

/// Liveness probe: the process answers, nothing else is consulted.
pub async fn live_handler(checker: web::Data<HealthChecker>) -> HttpResponse {
    let verdict = checker.liveness();
    probe_response(&checker, &verdict, None)
}

/// Readiness probe: database, cache, Redis and storage.
#[tracing::instrument(name = "Readiness probe.", skip(checker))]
pub async fn ready_handler(checker: web::Data<HealthChecker>) -> HttpResponse {
    let verdict = checker.evaluate(CheckGroup::Readiness).await;
    probe_response(&checker, &verdict, Some(checker.environment()))
}

/// Startup probe: configuration, route table and core services.
#[tracing::instrument(name = "Startup probe.", skip(checker))]
pub async fn startup_handler(checker: web::Data<HealthChecker>) -> HttpResponse {
    let verdict = checker.evaluate(CheckGroup::Startup).await;
    probe_response(&checker, &verdict, None)
}

/// General health with uptime, memory, disk and git revision.
#[tracing::instrument(name = "General health.", skip(checker, settings))]
pub async fn health_handler(
    checker: web::Data<HealthChecker>,
    settings: web::Data<Settings>,
) -> HttpResponse {
    let verdict = checker.general();
    let base_path = settings.app.base_path.clone();

    let (system, git) = match web::block(move || {
        (SystemInfo::collect(&base_path), GitInfo::read(&base_path))
    })
    .await
    {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("Failed to collect system information: {:?}", err);
            (SystemInfo::unavailable(&err.to_string()), GitInfo::unknown())
        }
    };

    let identity = checker.identity();
    respond(
        status_code(&verdict),
        &GeneralResponse {
            status: verdict.status,
            timestamp: timestamp(),
            service: &identity.service,
            version: &identity.version,
            environment: &identity.environment,
            pod: &identity.pod,
            uptime: checker.uptime(),
            system,
            git,
        },
    )
}
