//! Event records and the form they are built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::EventError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    #[schema(example = "RustConf")]
    pub title: String,
    #[schema(example = "2026-09-10")]
    pub date: String,
    #[schema(example = "09:30")]
    pub time: String,
    #[schema(example = "Montreal")]
    pub location: String,
    pub description: String,
    /// Stored upload filename, if an image was attached
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields to overwrite on update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl EventPatch {
    pub fn apply(self, event: &mut Event) {
        if let Some(v) = self.title {
            event.title = v;
        }
        if let Some(v) = self.date {
            event.date = v;
        }
        if let Some(v) = self.time {
            event.time = v;
        }
        if let Some(v) = self.location {
            event.location = v;
        }
        if let Some(v) = self.description {
            event.description = v;
        }
        if let Some(v) = self.image {
            event.image = Some(v);
        }
    }
}

/// Text fields collected from a multipart body, plus the stored image name.
///
/// Blank values are dropped as they arrive, so "present" always means
/// non-empty.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl EventForm {
    /// Record a text part. Returns `false` for names the form doesn't know.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "date" => &mut self.date,
            "time" => &mut self.time,
            "location" => &mut self.location,
            "description" => &mut self.description,
            _ => return false,
        };
        let value = value.trim();
        *slot = (!value.is_empty()).then(|| value.to_string());
        true
    }

    /// Build a new event; every text field is required.
    pub fn into_event(self) -> Result<Event, EventError> {
        let (Some(title), Some(date), Some(time), Some(location), Some(description)) = (
            self.title,
            self.date,
            self.time,
            self.location,
            self.description,
        ) else {
            return Err(EventError::InvalidInput(
                "Please fill all the required fields".to_string(),
            ));
        };

        Ok(Event {
            id: Uuid::new_v4(),
            title,
            date,
            time,
            location,
            description,
            image: self.image,
            created_at: Utc::now(),
        })
    }

    pub fn into_patch(self) -> EventPatch {
        EventPatch {
            title: self.title,
            date: self.date,
            time: self.time,
            location: self.location,
            description: self.description,
            image: self.image,
        }
    }
}

/// JSON body for create and update when no image is attached.
///
/// Runs through the same `EventForm` rules as multipart text parts.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventBody {
    #[schema(example = "RustConf")]
    pub title: Option<String>,
    #[schema(example = "2026-09-10")]
    pub date: Option<String>,
    #[schema(example = "09:30")]
    pub time: Option<String>,
    #[schema(example = "Montreal")]
    pub location: Option<String>,
    pub description: Option<String>,
}

impl EventBody {
    pub fn into_form(self) -> EventForm {
        let mut form = EventForm::default();
        for (name, value) in [
            ("title", self.title),
            ("date", self.date),
            ("time", self.time),
            ("location", self.location),
            ("description", self.description),
        ] {
            if let Some(value) = value {
                form.set_field(name, value);
            }
        }
        form
    }
}

/// Multipart body accepted by the create and update endpoints (docs only).
#[derive(Debug, ToSchema)]
pub struct EventUpload {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}
