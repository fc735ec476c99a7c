use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::AuthError;
use crate::gateway::state::AppState;

/// Gate a route on a valid bearer token.
///
/// - no usable `Authorization: Bearer <token>` header: 401, handler skipped
/// - token fails signature or expiry check: 403, handler skipped
/// - otherwise the decoded `Claims` go into request extensions
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::debug!("Rejected {}: no bearer token", request.uri().path());
        AuthError::Unauthorized
    })?;

    let claims = state.user_auth.verify_token(token).map_err(|e| {
        tracing::debug!("Rejected {}: {}", request.uri().path(), e);
        AuthError::from(e)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Any other scheme, or an empty
/// token, counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
