//! HMAC-signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user's email plus `iat`/`exp` in unix
//! seconds. Nothing is persisted: a token is valid exactly while its
//! signature checks out and `now < exp`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::store::UserIdentity;

/// Decoded token payload, attached to authenticated requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token not found")]
    Missing,

    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for `identity`, valid for the configured TTL from now.
    pub fn issue(&self, identity: &UserIdentity) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &UserIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = now.timestamp();
        let claims = Claims {
            email: identity.email.clone(),
            iat,
            exp: iat.saturating_add(self.ttl.num_seconds()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        // Expiry is checked below against `now` with no leeway; the library
        // check would use the wall clock and a 60s grace period.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            TokenError::Invalid
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: Uuid::new_v4(),
            username: "a".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::hours(1))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_claims_roundtrip() {
        let svc = service("test-secret");
        let token = svc.issue_at(&identity(), t0()).unwrap();
        let claims = svc.verify_at(&token, t0()).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp, t0().timestamp() + 3600);
    }

    #[test]
    fn test_valid_for_one_hour() {
        let svc = service("test-secret");
        let token = svc.issue_at(&identity(), t0()).unwrap();

        for offset in [0, 1, 60, 1800, 3599] {
            let now = t0() + Duration::seconds(offset);
            assert!(svc.verify_at(&token, now).is_ok(), "offset {offset}s");
        }
        for offset in [3600, 3601, 86_400] {
            let now = t0() + Duration::seconds(offset);
            assert_eq!(
                svc.verify_at(&token, now),
                Err(TokenError::Expired),
                "offset {offset}s"
            );
        }
    }

    #[test]
    fn test_other_secret_is_invalid() {
        let token = service("secret-a").issue_at(&identity(), t0()).unwrap();
        assert_eq!(
            service("secret-b").verify_at(&token, t0()),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_expired_token_with_bad_signature_is_invalid() {
        let token = service("secret-a").issue_at(&identity(), t0()).unwrap();
        let later = t0() + Duration::hours(5);
        assert_eq!(
            service("secret-b").verify_at(&token, later),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_empty_token_is_missing() {
        let svc = service("test-secret");
        assert_eq!(svc.verify_at("", t0()), Err(TokenError::Missing));
        assert_eq!(svc.verify_at("   ", t0()), Err(TokenError::Missing));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let svc = service("test-secret");
        for token in ["garbage", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
            assert_eq!(svc.verify_at(token, t0()), Err(TokenError::Invalid));
        }
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let svc = service("test-secret");
        let token = svc.issue_at(&identity(), t0()).unwrap();
        let other = svc
            .issue_at(
                &UserIdentity {
                    email: "b@x.com".to_string(),
                    ..identity()
                },
                t0(),
            )
            .unwrap();

        // Splice b's payload onto a's signature
        let a: Vec<&str> = token.split('.').collect();
        let b: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", a[0], b[1], a[2]);
        assert_eq!(svc.verify_at(&forged, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn test_verify_uses_wall_clock() {
        let svc = service("test-secret");
        let token = svc.issue(&identity()).unwrap();
        assert!(svc.verify(&token).is_ok());

        let stale = svc
            .issue_at(&identity(), Utc::now() - Duration::hours(2))
            .unwrap();
        assert_eq!(svc.verify(&stale), Err(TokenError::Expired));
    }
}
