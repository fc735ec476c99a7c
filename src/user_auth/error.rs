//! Authentication error types.
//!
//! Every variant maps to an HTTP status and a stable error name; the body is
//! always `{error, message}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::token::TokenError;
use crate::db::StoreError;
use crate::gateway::types::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing or malformed request fields
    #[error("{0}")]
    InvalidInput(String),

    #[error("User with this email already exists")]
    AlreadyExists,

    #[error("User not found. Register first")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token presented
    #[error("Token not found")]
    Unauthorized,

    /// Token presented but rejected
    #[error("{0}")]
    Forbidden(TokenError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(TokenError::Expired) => "TOKEN_EXPIRED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Store(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_)
            | Self::AlreadyExists
            | Self::NotFound
            | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Internal causes are never exposed.
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => Self::Unauthorized,
            other => Self::Forbidden(other),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!("Auth request failed: {:?}", self);
        }
        let body = ErrorResponse {
            error: self.name().to_string(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
