use anyhow::{Context, Result};
use chrono::Duration;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Database;
use crate::events::{EventStore, MemoryEventStore, PgEventStore, UploadStore};
use crate::user_auth::{MemoryUserStore, PgUserStore, TokenService, UserAuthService};

/// Shared application state, handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub user_auth: Arc<UserAuthService>,
    pub events: Arc<dyn EventStore>,
    pub uploads: Arc<UploadStore>,
    /// Present when running against PostgreSQL
    pub db: Option<Arc<Database>>,
}

impl AppState {
    /// Build state from configuration, connecting to PostgreSQL when a URL is
    /// configured and falling back to in-memory stores otherwise.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let ttl = Duration::try_seconds(config.auth.token_ttl_secs)
            .context("auth.token_ttl_secs out of range")?;
        let tokens = TokenService::new(&config.auth.jwt_secret, ttl);
        let uploads = UploadStore::new(&config.uploads.dir);
        uploads
            .ensure_dir()
            .await
            .with_context(|| format!("Failed to create upload dir {}", config.uploads.dir))?;

        let Some(url) = config.database.url.as_deref() else {
            tracing::warn!("No database configured; users and events are kept in memory");
            return Ok(Self::in_memory(tokens, uploads));
        };

        let db = Database::connect(url, config.database.max_connections)
            .await
            .context("Failed to connect to PostgreSQL")?;
        db.ensure_schema()
            .await
            .context("Failed to prepare database schema")?;

        let pool = db.pool().clone();
        Ok(Self {
            user_auth: Arc::new(UserAuthService::new(
                Arc::new(PgUserStore::new(pool.clone())),
                tokens,
            )),
            events: Arc::new(PgEventStore::new(pool)),
            uploads: Arc::new(uploads),
            db: Some(Arc::new(db)),
        })
    }

    pub fn in_memory(tokens: TokenService, uploads: UploadStore) -> Self {
        Self {
            user_auth: Arc::new(UserAuthService::new(
                Arc::new(MemoryUserStore::new()),
                tokens,
            )),
            events: Arc::new(MemoryEventStore::new()),
            uploads: Arc::new(uploads),
            db: None,
        }
    }

    pub fn storage_backend(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }
}
