//! Event records: CRUD endpoints, storage and image uploads.

pub mod error;
pub mod handlers;
pub mod models;
pub mod store;
pub mod uploads;

pub use error::EventError;
pub use models::{Event, EventBody, EventForm, EventPatch};
pub use store::{EventStore, MemoryEventStore, PgEventStore, UpdatedEvent};
pub use uploads::{UploadError, UploadStore};
