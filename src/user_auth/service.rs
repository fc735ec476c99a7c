use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::AuthError;
use super::password;
use super::store::{UserIdentity, UserRecord, UserStore};
use super::token::{Claims, TokenError, TokenService};
use crate::db::StoreError;

/// User Registration Request
///
/// Fields are optional at the wire level so a missing field is reported as
/// invalid input instead of a deserialization failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "a")]
    pub username: Option<String>,
    #[serde(default)]
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(example = "pw")]
    pub password: Option<String>,
}

/// User Login Request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(example = "pw")]
    pub password: Option<String>,
}

/// Login Response (JWT)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
}

pub struct UserAuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl UserAuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Register a new user
    pub async fn register(&self, req: RegisterRequest) -> Result<UserIdentity, AuthError> {
        let (Some(username), Some(email), Some(password)) = (
            present(req.username),
            present(req.email),
            present_secret(req.password),
        ) else {
            return Err(AuthError::InvalidInput(
                "Please fill all the fields".to_string(),
            ));
        };

        let password_hash = hash_blocking(password).await?;
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            created_at: Utc::now(),
        };
        let identity = record.identity();

        match self.store.insert(record).await {
            Ok(()) => {
                tracing::info!("Registered user {} ({})", identity.email, identity.id);
                Ok(identity)
            }
            Err(StoreError::Duplicate(_)) => {
                tracing::warn!("Registration attempt for existing email: {}", identity.email);
                Err(AuthError::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check an email/password pair against the stored hash.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthError> {
        let user = self
            .store
            .find_by_email(email.trim())
            .await?
            .ok_or(AuthError::NotFound)?;

        let stored_hash = user.password_hash.clone();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || {
            password::verify_password(&candidate, &stored_hash)
        })
        .await
        .map_err(|e| AuthError::Internal(format!("verify task failed: {}", e)))?
        .map_err(|e| AuthError::Internal(format!("stored hash unusable: {}", e)))?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user.into())
    }

    /// Login user and issue JWT
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let (Some(email), Some(password)) = (present(req.email), present_secret(req.password))
        else {
            return Err(AuthError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        };

        let identity = self.verify_credentials(&email, &password).await?;
        let token = self
            .tokens
            .issue(&identity)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {}", e)))?;

        tracing::info!("User {} logged in", identity.email);
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
        })
    }

    /// All registered users, without password hashes.
    pub async fn list_users(&self) -> Result<Vec<UserIdentity>, AuthError> {
        Ok(self.store.list().await?)
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.tokens.verify(token)
    }
}

/// Treat absent and blank values alike.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Passwords are taken byte for byte; only an empty one counts as missing.
fn present_secret(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn hash_blocking(plaintext: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| AuthError::Internal(format!("hash task failed: {}", e)))?
        .map_err(|e| AuthError::Internal(format!("hashing failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_auth::store::MemoryUserStore;
    use chrono::Duration;

    fn service() -> UserAuthService {
        UserAuthService::new(
            Arc::new(MemoryUserStore::new()),
            TokenService::new("service-test-secret", Duration::hours(1)),
        )
    }

    fn register_req(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let svc = service();
        let user = svc.register(register_req("a", "a@x.com", "pw")).await.unwrap();
        assert_eq!(user.email, "a@x.com");

        let err = svc
            .register(register_req("other", "a@x.com", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let svc = service();
        let cases = [
            RegisterRequest::default(),
            RegisterRequest {
                username: None,
                ..register_req("a", "a@x.com", "pw")
            },
            RegisterRequest {
                email: Some("  ".to_string()),
                ..register_req("a", "a@x.com", "pw")
            },
            RegisterRequest {
                password: Some(String::new()),
                ..register_req("a", "a@x.com", "pw")
            },
        ];
        for req in cases {
            let err = svc.register(req).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidInput(_)));
        }
        assert!(svc.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let svc = service();
        let registered = svc.register(register_req("a", "a@x.com", "pw")).await.unwrap();

        let identity = svc.verify_credentials("a@x.com", "pw").await.unwrap();
        assert_eq!(identity, registered);

        assert!(matches!(
            svc.verify_credentials("a@x.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.verify_credentials("nobody@x.com", "pw").await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let svc = service();
        svc.register(register_req("a", "a@x.com", "pw")).await.unwrap();

        let resp = svc.login(login_req("a@x.com", "pw")).await.unwrap();
        assert_eq!(resp.message, "Login successful");

        let claims = svc.verify_token(&resp.token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let svc = service();
        let err = svc
            .login(LoginRequest {
                email: Some("a@x.com".to_string()),
                password: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required");
    }

    #[tokio::test]
    async fn test_whitespace_password_accepted() {
        let svc = service();
        svc.register(register_req("a", "a@x.com", "   ")).await.unwrap();

        assert!(svc.login(login_req("a@x.com", "   ")).await.is_ok());
        assert!(matches!(
            svc.verify_credentials("a@x.com", " ").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            svc.login(login_req("a@x.com", "")).await,
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_email_is_trimmed() {
        let svc = service();
        svc.register(register_req("a", "  a@x.com ", "pw")).await.unwrap();
        assert!(svc.verify_credentials("a@x.com", "pw").await.is_ok());
    }
}
