//! Backing service connectors
//!
//! Every dependency the health probes talk to sits behind a trait defined here, so
//! probes never depend on a concrete client and tests can swap in the doubles from each
//! module's `mock` submodule.
//!
//! ## Architecture Pattern
//!
//! 1. Define trait in `{service}.rs`
//! 2. Implement the real client in same file
//! 3. Provide doubles in `{service}::mock`
//! 4. Inject `Arc<dyn Trait>` into probes at startup

pub mod broker;
pub mod cache;
pub mod database;
pub mod errors;
pub mod registry;
pub mod storage;

pub use broker::{BrokerClient, RedisBroker};
pub use cache::{CacheStore, MemoryCacheStore, RedisCacheStore, UnavailableCacheStore};
pub use database::{DatabaseConnector, PgDatabase};
pub use errors::ConnectorError;
pub use registry::{RouteEntry, ServiceRegistry};
pub use storage::{Filesystem, LocalFilesystem};
