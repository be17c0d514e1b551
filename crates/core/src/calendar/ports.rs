//! Port interfaces for the calendar bridge
//!
//! These traits define the boundaries between the deferral/dispatch logic
//! and the host: the native calendar store, the OS permission facility, and
//! the sink that carries a reply back across the runtime boundary.

use async_trait::async_trait;
use calbridge_domain::{
    CalendarRow, ContentUri, EventQuery, EventRow, EventValues, Reply, Result,
};

use crate::permissions::RequestCode;

/// Queryable, writable calendar store addressed like the platform provider.
///
/// Implementations read whatever the store holds at query time; there is no
/// snapshot isolation between calls.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// All calendars, in store order.
    async fn query_calendars(&self) -> Result<Vec<CalendarRow>>;

    /// A single calendar by identifier.
    async fn query_calendar(&self, calendar_id: i64) -> Result<Option<CalendarRow>>;

    /// Non-deleted events of one calendar within the query bounds, ordered
    /// ascending by start.
    async fn query_events(&self, query: EventQuery) -> Result<Vec<EventRow>>;

    /// Insert a new event row and return the URI of the created row.
    async fn insert_event(&self, values: &EventValues) -> Result<ContentUri>;

    /// Update an existing event row; returns the number of rows touched.
    async fn update_event(&self, event_id: i64, values: &EventValues) -> Result<usize>;

    /// The `duration` column of an event, used as the recurrence signal.
    async fn event_duration(&self, event_id: i64) -> Result<Option<String>>;

    /// Delete an event row; returns the number of rows removed.
    async fn delete_event(&self, event_id: i64) -> Result<usize>;
}

/// Read/write calendar permission state and the asynchronous prompt.
pub trait PermissionGate: Send + Sync {
    /// True only when both the read and write calendar permissions are held.
    fn is_granted(&self) -> bool;

    /// Fire-and-forget prompt. The answer arrives later through
    /// [`PermissionResultRouter`](crate::permissions::PermissionResultRouter)
    /// keyed by `request_code`.
    fn request_permissions(&self, request_code: RequestCode);
}

/// Sink for the single reply of one method call.
pub trait MethodResult: Send + Sync {
    fn deliver(&self, reply: Reply);
}
