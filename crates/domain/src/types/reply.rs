//! Operation kinds and the replies delivered for them

use serde::{Deserialize, Serialize};

use super::{Calendar, Event};
use crate::errors::CalendarError;
use crate::impl_method_name_conversions;

/// The five calendar operations reachable through the method surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    ListCalendars,
    GetCalendar,
    ListEvents,
    UpsertEvent,
    DeleteEvent,
}

impl_method_name_conversions!(OperationKind {
    ListCalendars => "retrieveCalendars",
    GetCalendar => "retrieveCalendar",
    ListEvents => "retrieveEvents",
    UpsertEvent => "createOrUpdateEvent",
    DeleteEvent => "deleteEvent",
});

/// Successful result value of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Calendars(Vec<Calendar>),
    Calendar(Calendar),
    Events(Vec<Event>),
    EventId(String),
    Deleted(bool),
}

/// Exactly one of these is delivered per original call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `None` means the permission prompt was denied.
    Success(Option<Payload>),
    Error(CalendarError),
}

impl Reply {
    pub const fn denied() -> Self {
        Self::Success(None)
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Success(payload) => payload.as_ref(),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CalendarError> {
        match self {
            Self::Error(err) => Some(err),
            Self::Success(_) => None,
        }
    }
}

impl From<Payload> for Reply {
    fn from(value: Payload) -> Self {
        Self::Success(Some(value))
    }
}

impl From<CalendarError> for Reply {
    fn from(value: CalendarError) -> Self {
        Self::Error(value)
    }
}
