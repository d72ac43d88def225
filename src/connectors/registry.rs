//! Application service registry.
//!
//! Filled once during startup with the routes the server mounts and the services it
//! binds, then shared read-only with the startup probes.

use super::errors::ConnectorError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub method: &'static str,
    pub path: String,
}

#[derive(Debug, Default, Clone)]
pub struct ServiceRegistry {
    routes: Vec<RouteEntry>,
    services: BTreeSet<String>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_route(&mut self, method: &'static str, path: impl Into<String>) -> &mut Self {
        self.routes.push(RouteEntry {
            method,
            path: path.into(),
        });
        self
    }

    pub fn bind(&mut self, service: impl Into<String>) -> &mut Self {
        self.services.insert(service.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn resolve(&self, service: &str) -> Result<(), ConnectorError> {
        if self.services.contains(service) {
            Ok(())
        } else {
            Err(ConnectorError::NotFound(format!(
                "service `{}` is not bound",
                service
            )))
        }
    }
}
