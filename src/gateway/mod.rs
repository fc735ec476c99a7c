pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::events::handlers as events;
use crate::user_auth::{handlers as auth, jwt_auth_middleware};
use state::AppState;

/// Largest accepted multipart body on the event routes
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Assemble the full router. Every API route lives under `/api`.
pub fn build_router(state: Arc<AppState>) -> Router {
    // ==========================================================================
    // Protected Routes (bearer token required)
    // ==========================================================================
    let protected_routes = Router::new()
        .route("/users", get(auth::list_users))
        .route("/getAll", get(auth::list_users))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    // ==========================================================================
    // Event Routes
    // ==========================================================================
    let event_routes = Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Paths used by earlier clients
        .route("/create/event", post(events::create_event))
        .route("/getAll/events", get(events::list_events))
        .route("/getAll/event", get(events::list_events))
        .route("/get/event/{id}", get(events::get_event))
        .route("/update/event/{id}", put(events::update_event))
        .route("/delete/event/{id}", delete(events::delete_event))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(protected_routes)
        .merge(event_routes);

    Router::new()
        .nest("/api", api)
        .with_state(state)
        // Stateless, so merged after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the process is stopped.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} (port already in use?)", addr))?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
