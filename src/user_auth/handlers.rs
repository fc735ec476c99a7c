use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::error::AuthError;
use super::service::{LoginRequest, LoginResponse, RegisterRequest};
use super::store::UserIdentity;
use super::token::Claims;
use crate::gateway::{state::AppState, types::MessageResponse};

/// Register a new user
///
/// POST /api/register
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Missing fields or email already registered", body = crate::gateway::types::ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let Json(req) = payload.map_err(|e| AuthError::InvalidInput(e.body_text()))?;
    state.user_auth.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Login user
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields, unknown user or wrong password", body = crate::gateway::types::ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(req) = payload.map_err(|e| AuthError::InvalidInput(e.body_text()))?;
    match state.user_auth.login(req).await {
        Ok(resp) => Ok(Json(resp)),
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Err(e)
        }
    }
}

/// List all users
///
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All registered users (no password hashes)", body = Vec<UserIdentity>),
        (status = 401, description = "Missing bearer token", body = crate::gateway::types::ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = crate::gateway::types::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<UserIdentity>>, AuthError> {
    let users = state.user_auth.list_users().await?;
    tracing::debug!("{} listed {} users", claims.email, users.len());
    Ok(Json(users))
}
