//! Gateway-level handlers that don't belong to a feature module.

pub mod health;

pub use health::{HealthResponse, health_check};
