//! Raw rows as returned by the native calendar store
//!
//! These mirror the provider projections. Mappers in the core crate turn them
//! into [`Calendar`](super::Calendar) and [`Event`](super::Event) records.

/// One row of the calendars projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRow {
    pub id: i64,
    pub display_name: Option<String>,
    pub access_level: i32,
    pub account_name: Option<String>,
    pub owner_account: Option<String>,
}

/// One row of the events projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: i64,
    pub calendar_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub dtstart: i64,
    pub dtend: Option<i64>,
}
