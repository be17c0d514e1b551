//! Pending operation records and the codes that correlate them

use std::fmt;
use std::time::Instant;

use calbridge_domain::{Event, OperationKind};

use crate::calendar::ResultHandle;

/// Correlation token, reused as the OS request code of a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestCode(i32);

impl RequestCode {
    pub const FIRST: Self = Self(1);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    pub(crate) fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a permission prompt's grant vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    /// Platform value for a granted permission.
    pub const GRANTED_CODE: i32 = 0;
    /// Platform value for a denied permission.
    pub const DENIED_CODE: i32 = -1;

    pub const fn from_code(code: i32) -> Self {
        if code == Self::GRANTED_CODE {
            Self::Granted
        } else {
            Self::Denied
        }
    }
}

/// Lifecycle of a request code as seen by the result router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    /// Never allocated by this process.
    Idle,
    /// Record stashed, waiting for the prompt's answer.
    AwaitingPrompt,
    /// Record consumed (answered, finished or expired).
    Resolved,
}

/// Original arguments of a call, captured exactly as the operation needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarRequest {
    RetrieveCalendars,
    RetrieveCalendar { calendar_id: String },
    RetrieveEvents { calendar_id: String, start_ms: i64, end_ms: i64 },
    CreateOrUpdateEvent { calendar_id: String, event: Option<Event> },
    DeleteEvent { calendar_id: String, event_id: String },
}

impl CalendarRequest {
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::RetrieveCalendars => OperationKind::ListCalendars,
            Self::RetrieveCalendar { .. } => OperationKind::GetCalendar,
            Self::RetrieveEvents { .. } => OperationKind::ListEvents,
            Self::CreateOrUpdateEvent { .. } => OperationKind::UpsertEvent,
            Self::DeleteEvent { .. } => OperationKind::DeleteEvent,
        }
    }
}

/// A call parked while its permission prompt is outstanding.
#[derive(Debug)]
pub struct PendingOperation {
    request_code: RequestCode,
    request: CalendarRequest,
    result: ResultHandle,
    created_at: Instant,
}

impl PendingOperation {
    pub(crate) fn new(
        request_code: RequestCode,
        request: CalendarRequest,
        result: ResultHandle,
        created_at: Instant,
    ) -> Self {
        Self { request_code, request, result, created_at }
    }

    /// The cache key this record is stored under.
    pub fn request_code(&self) -> RequestCode {
        self.request_code
    }

    pub fn kind(&self) -> OperationKind {
        self.request.kind()
    }

    pub fn request(&self) -> &CalendarRequest {
        &self.request
    }

    pub fn result(&self) -> &ResultHandle {
        &self.result
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn into_parts(self) -> (CalendarRequest, ResultHandle) {
        (self.request, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_counts_as_granted() {
        assert_eq!(PermissionStatus::from_code(0), PermissionStatus::Granted);
        assert_eq!(PermissionStatus::from_code(-1), PermissionStatus::Denied);
        assert_eq!(PermissionStatus::from_code(7), PermissionStatus::Denied);
    }

    #[test]
    fn request_code_stops_at_i32_max() {
        assert_eq!(RequestCode::FIRST.next(), Some(RequestCode::new(2)));
        assert_eq!(RequestCode::new(i32::MAX).next(), None);
    }

    #[test]
    fn request_kind_matches_operation() {
        let request = CalendarRequest::DeleteEvent { calendar_id: "1".into(), event_id: "2".into() };
        assert_eq!(request.kind(), OperationKind::DeleteEvent);
        assert_eq!(CalendarRequest::RetrieveCalendars.kind(), OperationKind::ListCalendars);
    }
}
