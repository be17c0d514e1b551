//! Row mappers and identifier parsing
//!
//! Pure conversions between store rows and the records handed to callers.
//! Nothing here touches the store.

use calbridge_domain::constants::{
    CREATE_EVENT_ARGUMENTS_NOT_VALID_MESSAGE, EVENT_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE,
};
use calbridge_domain::{
    AccessLevel, Calendar, CalendarError, CalendarRow, ContentUri, Event, EventRow, EventValues,
};

/// Build a [`Calendar`] from a calendars row.
///
/// The calendar is read-only unless the access level allows writes. A missing
/// display name maps to an empty name.
pub fn parse_calendar(row: &CalendarRow) -> Calendar {
    let access = AccessLevel::from(row.access_level);
    Calendar::new(
        row.id.to_string(),
        row.display_name.clone().unwrap_or_default(),
        !access.is_writable(),
    )
}

/// Build an [`Event`] from an events row.
pub fn parse_event(row: &EventRow) -> Event {
    Event {
        id: Some(row.id.to_string()),
        calendar_id: row.calendar_id.to_string(),
        title: row.title.clone().unwrap_or_default(),
        description: row.description.clone(),
        start: row.dtstart,
        // Rows without an end are instantaneous.
        end: row.dtend.unwrap_or(row.dtstart),
    }
}

/// Column values for writing `event` into `calendar_id`.
pub fn event_values(calendar_id: i64, event: &Event, time_zone: &str) -> EventValues {
    EventValues {
        dtstart: event.start,
        dtend: event.end,
        title: event.title.clone(),
        description: event.description.clone(),
        calendar_id,
        event_timezone: time_zone.to_string(),
    }
}

/// Parse a caller-supplied calendar identifier.
///
/// Only non-negative integers are calendar ids. Surrounding whitespace is
/// not accepted.
pub fn parse_calendar_id(calendar_id: &str) -> Option<i64> {
    parse_event_id(calendar_id).filter(|id| *id >= 0)
}

/// Parse a caller-supplied event identifier: any string `i64` accepts.
pub fn parse_event_id(event_id: &str) -> Option<i64> {
    event_id.parse::<i64>().ok()
}

/// The row an upsert should update, or `None` for an insert.
///
/// An absent or blank id means insert.
///
/// # Errors
/// `InvalidArgument` when a non-blank id is not an identifier.
pub fn existing_event_id(event: &Event) -> Result<Option<i64>, CalendarError> {
    match event.id.as_deref() {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_event_id(raw).map(Some).ok_or_else(|| {
            CalendarError::InvalidArgument(EVENT_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE.into())
        }),
    }
}

/// Identifier of a freshly inserted row, taken from its URI.
///
/// # Errors
/// `EventCreationFailure` when the URI does not end in an identifier.
pub fn inserted_event_id(uri: &ContentUri) -> Result<i64, CalendarError> {
    uri.last_path_segment().and_then(parse_event_id).ok_or_else(|| {
        CalendarError::EventCreationFailure(CREATE_EVENT_ARGUMENTS_NOT_VALID_MESSAGE.into())
    })
}

/// Recurrence signal: a non-blank `duration` column.
///
/// Approximate. Single events carry `dtend` and leave `duration` empty.
pub fn is_recurring(duration: Option<&str>) -> bool {
    duration.is_some_and(|value| !value.trim().is_empty())
}
