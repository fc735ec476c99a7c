//! User accounts and bearer-token authentication.
//!
//! ## Components
//! - `password`: Argon2id hashing
//! - `token`: HS256 token issuance and verification
//! - `store`: credential storage (PostgreSQL / in-memory)
//! - `service`: registration, login, listing
//! - `middleware`: Axum bearer-token gate
//! - `handlers`: HTTP endpoints
//! - `error`: error taxonomy and HTTP mapping

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use middleware::{bearer_token, jwt_auth_middleware};
pub use service::{LoginRequest, LoginResponse, RegisterRequest, UserAuthService};
pub use store::{MemoryUserStore, PgUserStore, UserIdentity, UserRecord, UserStore};
pub use token::{Claims, TokenError, TokenService};
