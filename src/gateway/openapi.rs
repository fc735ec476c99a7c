//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:3000/docs`
//! - OpenAPI JSON: `http://localhost:3000/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::events::Event;
use crate::events::handlers::{EventCreatedResponse, EventUpdatedResponse};
use crate::events::models::{EventBody, EventUpload};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{ErrorResponse, MessageResponse};
use crate::user_auth::{LoginRequest, LoginResponse, RegisterRequest, UserIdentity};

/// Bearer token issued by `/api/login`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/login, valid for one hour"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EventDesk API",
        version = "0.1.0",
        description = "User accounts, bearer-token auth and event management.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::user_auth::handlers::list_users,
        crate::events::handlers::create_event,
        crate::events::handlers::list_events,
        crate::events::handlers::get_event,
        crate::events::handlers::update_event,
        crate::events::handlers::delete_event,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            ErrorResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserIdentity,
            Event,
            EventUpload,
            EventBody,
            EventCreatedResponse,
            EventUpdatedResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "User directory (bearer token required)"),
        (name = "Events", description = "Event management"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
