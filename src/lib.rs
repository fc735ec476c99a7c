//! EventDesk - event management backend
//!
//! User registration and login with bearer tokens, plus CRUD over event
//! records, served over HTTP with axum.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`user_auth`] - credential store, token service, auth middleware
//! - [`events`] - event store, image uploads, event endpoints
//! - [`gateway`] - router, shared state, OpenAPI docs

pub mod config;
pub mod db;
pub mod events;
pub mod gateway;
pub mod logging;
pub mod user_auth;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use db::{Database, StoreError};
pub use events::{Event, EventStore, UploadStore};
pub use gateway::{build_router, state::AppState};
pub use user_auth::{Claims, TokenError, TokenService, UserAuthService, UserIdentity};
