//! Calendar method decoding and dispatch

use calbridge_core::{CalendarDelegate, CalendarRequest, Dispatch, ResultHandle};
use calbridge_domain::{ErrorCode, Event, OperationKind};
use serde_json::Value;
use thiserror::Error;

use crate::channel::{ChannelReply, MethodCall};

pub const CALENDAR_ID_ARGUMENT: &str = "calendarId";
pub const START_DATE_ARGUMENT: &str = "startDate";
pub const END_DATE_ARGUMENT: &str = "endDate";
pub const EVENT_ID_ARGUMENT: &str = "eventId";
pub const EVENT_TITLE_ARGUMENT: &str = "eventTitle";
pub const EVENT_DESCRIPTION_ARGUMENT: &str = "eventDescription";
pub const EVENT_START_DATE_ARGUMENT: &str = "eventStartDate";
pub const EVENT_END_DATE_ARGUMENT: &str = "eventEndDate";

/// Reasons a call never reaches the delegate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Method {0} is not implemented")]
    NotImplemented(String),

    #[error("Argument {key} {problem}")]
    InvalidArgument { key: &'static str, problem: &'static str },
}

impl From<CommandError> for ChannelReply {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotImplemented(_) => Self::NotImplemented,
            CommandError::InvalidArgument { .. } => {
                Self::error(ErrorCode::InvalidArgument, err.to_string())
            }
        }
    }
}

/// Turn a method call into the request the delegate runs.
///
/// # Errors
/// `NotImplemented` for unknown method names, `InvalidArgument` for missing
/// or ill-typed arguments.
pub fn decode(call: &MethodCall) -> Result<CalendarRequest, CommandError> {
    let kind: OperationKind =
        call.method.parse().map_err(|_| CommandError::NotImplemented(call.method.clone()))?;

    let request = match kind {
        OperationKind::ListCalendars => CalendarRequest::RetrieveCalendars,
        OperationKind::GetCalendar => {
            CalendarRequest::RetrieveCalendar { calendar_id: required_str(call, CALENDAR_ID_ARGUMENT)? }
        }
        OperationKind::ListEvents => CalendarRequest::RetrieveEvents {
            calendar_id: required_str(call, CALENDAR_ID_ARGUMENT)?,
            start_ms: required_millis(call, START_DATE_ARGUMENT)?,
            end_ms: required_millis(call, END_DATE_ARGUMENT)?,
        },
        OperationKind::UpsertEvent => {
            let calendar_id = required_str(call, CALENDAR_ID_ARGUMENT)?;
            let event = decode_event(call, &calendar_id)?;
            CalendarRequest::CreateOrUpdateEvent { calendar_id, event }
        }
        OperationKind::DeleteEvent => CalendarRequest::DeleteEvent {
            calendar_id: required_str(call, CALENDAR_ID_ARGUMENT)?,
            event_id: required_str(call, EVENT_ID_ARGUMENT)?,
        },
    };

    Ok(request)
}

/// Run a decoded request through the matching delegate operation.
pub async fn execute(
    delegate: &CalendarDelegate,
    request: CalendarRequest,
    result: ResultHandle,
) -> Dispatch {
    match request {
        CalendarRequest::RetrieveCalendars => delegate.retrieve_calendars(result).await,
        CalendarRequest::RetrieveCalendar { calendar_id } => {
            delegate.retrieve_calendar(&calendar_id, result).await
        }
        CalendarRequest::RetrieveEvents { calendar_id, start_ms, end_ms } => {
            delegate.retrieve_events(&calendar_id, start_ms, end_ms, result).await
        }
        CalendarRequest::CreateOrUpdateEvent { calendar_id, event } => {
            delegate.create_or_update_event(&calendar_id, event, result).await
        }
        CalendarRequest::DeleteEvent { calendar_id, event_id } => {
            delegate.delete_event(&calendar_id, &event_id, result).await
        }
    }
}

/// No title means no event; the delegate reports that as a creation failure.
fn decode_event(call: &MethodCall, calendar_id: &str) -> Result<Option<Event>, CommandError> {
    if !call.has_argument(EVENT_TITLE_ARGUMENT) {
        return Ok(None);
    }

    let title = required_str(call, EVENT_TITLE_ARGUMENT)?;
    let start = required_millis(call, EVENT_START_DATE_ARGUMENT)?;
    let end = required_millis(call, EVENT_END_DATE_ARGUMENT)?;

    let mut event = Event::new(title, start, end).with_calendar_id(calendar_id);
    if let Some(id) = optional_str(call, EVENT_ID_ARGUMENT)? {
        event = event.with_id(id);
    }
    if let Some(description) = optional_str(call, EVENT_DESCRIPTION_ARGUMENT)? {
        event = event.with_description(description);
    }

    Ok(Some(event))
}

fn required_str(call: &MethodCall, key: &'static str) -> Result<String, CommandError> {
    optional_str(call, key)?
        .ok_or(CommandError::InvalidArgument { key, problem: "is missing" })
}

fn optional_str(call: &MethodCall, key: &'static str) -> Result<Option<String>, CommandError> {
    match call.argument(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CommandError::InvalidArgument { key, problem: "is not a string" }),
    }
}

/// Epoch milliseconds; integral floats are accepted since some hosts only
/// have doubles.
fn required_millis(call: &MethodCall, key: &'static str) -> Result<i64, CommandError> {
    let value =
        call.argument(key).ok_or(CommandError::InvalidArgument { key, problem: "is missing" })?;

    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|ms| ms.fract() == 0.0).map(|ms| ms as i64))
        .ok_or(CommandError::InvalidArgument { key, problem: "is not a timestamp" })
}
