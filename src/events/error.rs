use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::uploads::UploadError;
use crate::db::StoreError;
use crate::gateway::types::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Event not found")]
    NotFound,

    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

impl EventError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound => "EVENT_NOT_FOUND",
            Self::Upload(_) | Self::Store(_) => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upload(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let message = if status.is_server_error() {
            tracing::error!("Event request failed: {:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse {
            error: self.name().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
