//! Response bodies shared across endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain acknowledgement: `{message}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable name
    #[schema(example = "INVALID_INPUT")]
    pub error: String,
    /// Human-readable explanation
    #[schema(example = "Please fill all the fields")]
    pub message: String,
}
