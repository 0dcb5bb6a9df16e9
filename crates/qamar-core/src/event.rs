use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub uuid: Uuid,

    pub title: String,

    pub starts_at: DateTime<Utc>,

    #[serde(default)]
    pub location: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, starts_at: DateTime<Utc>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            starts_at,
            location: None,
        }
    }
}
