use axum::{
    Json,
    extract::{FromRequest, Multipart, Path, Request, State, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode, header},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::EventError;
use super::models::{Event, EventBody, EventForm};
use super::uploads::UploadStore;
use crate::gateway::{state::AppState, types::MessageResponse};

/// Multipart part carrying the image file
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, ToSchema)]
pub struct EventCreatedResponse {
    #[schema(example = "Event created successfully")]
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventUpdatedResponse {
    #[schema(example = "Event updated successfully")]
    pub message: String,
    #[serde(rename = "updatedEvent")]
    pub updated_event: Event,
}

/// Create an event
///
/// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    request_body(content(
        (super::models::EventUpload = "multipart/form-data"),
        (EventBody = "application/json")
    )),
    responses(
        (status = 201, description = "Event created successfully", body = EventCreatedResponse),
        (status = 400, description = "Missing required fields", body = crate::gateway::types::ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Events"
)]
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<EventCreatedResponse>), EventError> {
    let form = read_event_body(&state.uploads, request).await?;
    let image = form.image.clone();

    let event = match form.into_event() {
        Ok(event) => event,
        Err(e) => {
            state.uploads.discard(image).await;
            return Err(e);
        }
    };

    let id = event.id;
    if let Err(e) = state.events.insert(event).await {
        state.uploads.discard(image).await;
        return Err(e.into());
    }

    tracing::info!("Created event {}", id);
    Ok((
        StatusCode::CREATED,
        Json(EventCreatedResponse {
            message: "Event created successfully".to_string(),
            id,
        }),
    ))
}

/// List all events
///
/// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "All events, oldest first", body = Vec<Event>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Events"
)]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Event>>, EventError> {
    Ok(Json(state.events.list().await?))
}

/// Get one event
///
/// GET /api/events/{id}
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "The event", body = Event),
        (status = 404, description = "Event not found", body = crate::gateway::types::ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, EventError> {
    let id = parse_event_id(&id)?;
    let event = state.events.get(id).await?.ok_or(EventError::NotFound)?;
    Ok(Json(event))
}

/// Update an event
///
/// Only non-empty fields are applied; an uploaded image replaces the old one.
///
/// PUT /api/events/{id}
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = String, Path, description = "Event ID")),
    request_body(content(
        (super::models::EventUpload = "multipart/form-data"),
        (EventBody = "application/json")
    )),
    responses(
        (status = 200, description = "Event updated successfully", body = EventUpdatedResponse),
        (status = 404, description = "Event not found", body = crate::gateway::types::ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Events"
)]
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<EventUpdatedResponse>, EventError> {
    let id = parse_event_id(&id)?;
    let form = read_event_body(&state.uploads, request).await?;
    let new_image = form.image.clone();

    let updated = match state.events.update(id, form.into_patch()).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            state.uploads.discard(new_image).await;
            return Err(EventError::NotFound);
        }
        Err(e) => {
            state.uploads.discard(new_image).await;
            return Err(e.into());
        }
    };

    if updated.replaced_image != new_image {
        state.uploads.discard(updated.replaced_image).await;
    }

    tracing::info!("Updated event {}", id);
    Ok(Json(EventUpdatedResponse {
        message: "Event updated successfully".to_string(),
        updated_event: updated.event,
    }))
}

/// Delete an event
///
/// DELETE /api/events/{id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted successfully", body = MessageResponse),
        (status = 404, description = "Event not found", body = crate::gateway::types::ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, EventError> {
    let id = parse_event_id(&id)?;
    let deleted = state.events.delete(id).await?.ok_or(EventError::NotFound)?;
    state.uploads.discard(deleted.image).await;

    tracing::info!("Deleted event {}", id);
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Ids that aren't UUIDs can't name an event.
fn parse_event_id(raw: &str) -> Result<Uuid, EventError> {
    Uuid::parse_str(raw.trim()).map_err(|_| EventError::NotFound)
}

/// `application/json` bodies carry text fields only; anything else is read
/// as multipart so an image can come along.
async fn read_event_body(uploads: &UploadStore, request: Request) -> Result<EventForm, EventError> {
    if is_json(request.headers()) {
        let Json(body) = Json::<EventBody>::from_request(request, &())
            .await
            .map_err(|e| EventError::InvalidInput(e.body_text()))?;
        return Ok(body.into_form());
    }
    let multipart = Multipart::from_request(request, &()).await;
    read_event_form(uploads, multipart).await
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Collect text parts and stream the image part (if any) to the upload store.
///
/// On failure any image already stored for this request is removed.
async fn read_event_form(
    uploads: &UploadStore,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<EventForm, EventError> {
    let mut multipart = multipart.map_err(|e| EventError::InvalidInput(e.body_text()))?;
    let mut form = EventForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                uploads.discard(form.image.take()).await;
                return Err(EventError::InvalidInput(e.body_text()));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_FIELD {
            // Browsers send an empty part for an untouched file input
            let original = match field.file_name() {
                Some(f) if !f.is_empty() => f.to_string(),
                _ => continue,
            };
            match uploads.save(&original, field).await {
                Ok(stored) => {
                    let replaced = form.image.replace(stored);
                    uploads.discard(replaced).await;
                }
                Err(e) => {
                    uploads.discard(form.image.take()).await;
                    return Err(e.into());
                }
            }
        } else {
            match field.text().await {
                Ok(value) => {
                    if !form.set_field(&name, value) {
                        tracing::debug!("Ignoring unknown form field '{}'", name);
                    }
                }
                Err(e) => {
                    uploads.discard(form.image.take()).await;
                    return Err(EventError::InvalidInput(e.body_text()));
                }
            }
        }
    }

    Ok(form)
}
