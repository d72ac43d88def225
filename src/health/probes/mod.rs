//! Dependency probes.
//!
//! A probe performs one bounded operation against one dependency and reports the
//! outcome as a [`CheckResult`]. Errors are converted at the probe boundary and never
//! escape it.

mod broker;
mod cache;
mod config;
mod database;
mod routes;
mod services;
mod storage;

use super::models::CheckResult;
use async_trait::async_trait;

pub use broker::RedisProbe;
pub use cache::CacheProbe;
pub use config::ConfigProbe;
pub use database::DatabaseProbe;
pub use routes::RoutesProbe;
pub use services::{ServicesProbe, CORE_SERVICES};
pub use storage::StorageProbe;

#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self) -> CheckResult;
}
