//! Credential storage backends.
//!
//! `UserStore` is the seam between the auth service and persistence. The
//! PostgreSQL backend relies on the `users_email_key` unique index; the
//! in-memory backend keys its map by email. Either way a duplicate email is
//! rejected atomically by the store itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::StoreError;

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UserIdentity {
    pub id: Uuid,
    #[schema(example = "a")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
}

/// Stored user, including the password hash. Deliberately not `Serialize`.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl From<UserRecord> for UserIdentity {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `StoreError::Duplicate("email")` when the
    /// email is taken.
    async fn insert(&self, user: UserRecord) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// All users in registration order.
    async fn list(&self) -> Result<Vec<UserIdentity>, StoreError>;
}

// ============================================================================
// PostgreSQL Implementation
// ============================================================================

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: UserRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO users (id, username, email, password_hash, created_at)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, "email"))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            r#"SELECT id, username, email, password_hash, created_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            id: r.get("id"),
            username: r.get("username"),
            email: r.get("email"),
            password_hash: r.get("password_hash"),
            created_at: r.get("created_at"),
        }))
    }

    async fn list(&self) -> Result<Vec<UserIdentity>, StoreError> {
        // The hash column is never selected
        let rows = sqlx::query(r#"SELECT id, username, email FROM users ORDER BY created_at, id"#)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserIdentity {
                id: r.get("id"),
                username: r.get("username"),
                email: r.get("email"),
            })
            .collect())
    }
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

/// Map-backed store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: UserRecord) -> Result<(), StoreError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate("email")),
            Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn list(&self) -> Result<Vec<UserIdentity>, StoreError> {
        let mut records: Vec<UserRecord> = self.users.iter().map(|u| u.value().clone()).collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records.into_iter().map(UserIdentity::from).collect())
    }
}
