//! Event records and the write values derived from them

use serde::{Deserialize, Serialize};

/// An event as exchanged with callers.
///
/// `id` is absent until the event has been created in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub calendar_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Epoch milliseconds.
    pub start: i64,
    /// Epoch milliseconds.
    pub end: i64,
}

impl Event {
    pub fn new(title: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            id: None,
            calendar_id: String::new(),
            title: title.into(),
            description: None,
            start,
            end,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }
}

/// Column values written on insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventValues {
    pub dtstart: i64,
    pub dtend: i64,
    pub title: String,
    pub description: Option<String>,
    pub calendar_id: i64,
    pub event_timezone: String,
}

/// Filter for an events query.
///
/// Matches rows of one calendar whose instance lies within
/// `[start_ms, end_ms]` and that are not soft-deleted, ordered by start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    pub calendar_id: i64,
    pub start_ms: i64,
    pub end_ms: i64,
}
