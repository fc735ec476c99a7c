//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::super::state::AppState;

/// Health check response data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
    /// `postgres` or `memory`
    #[schema(example = "postgres")]
    pub storage: String,
    /// Git revision the binary was built from
    pub build: String,
}

/// Health check endpoint
///
/// Pings the database when one is configured. Failure details go to the log,
/// never into the response.
///
/// - Healthy: 200 OK
/// - Database unreachable: 503 Service Unavailable
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("[HEALTH] PostgreSQL ping failed: {}", e);
                false
            }
        },
        None => true,
    };

    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            timestamp_ms: Utc::now().timestamp_millis(),
            storage: state.storage_backend().to_string(),
            build: env!("GIT_HASH").to_string(),
        }),
    )
}
