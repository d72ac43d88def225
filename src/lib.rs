pub mod configuration;
pub mod connectors;
pub mod health;
pub mod helpers;
pub mod routes;
pub mod startup;
pub mod telemetry;
