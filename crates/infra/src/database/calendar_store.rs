//! SQLite-backed implementation of the `CalendarStore` port.

use std::sync::Arc;

use async_trait::async_trait;
use calbridge_core::CalendarStore;
use calbridge_domain::{
    AccessLevel, CalendarRow, ContentUri, EventQuery, EventRow, EventValues, Result,
};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, instrument};

use super::manager::{map_sql_error, DbManager};

const CALENDAR_COLUMNS: &str = "id, display_name, access_level, account_name, owner_account";
const EVENT_COLUMNS: &str = "id, calendar_id, title, description, dtstart, dtend";

/// Calendar store over the `calendars` and `events` tables.
///
/// Deletes are soft: the row stays with `deleted = 1` and disappears from
/// queries, mirroring the platform provider.
pub struct SqliteCalendarStore {
    db: Arc<DbManager>,
}

impl SqliteCalendarStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Seed a calendar row; returns its id.
    pub fn insert_calendar(
        &self,
        display_name: &str,
        access: AccessLevel,
        account: &str,
    ) -> Result<i64> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "INSERT INTO calendars (display_name, access_level, account_name, owner_account)
             VALUES (?1, ?2, ?3, ?3)",
            params![display_name, access.value(), account],
        )
        .map_err(map_sql_error)?;
        Ok(conn.last_insert_rowid())
    }

    /// Seed a recurring event row carrying `duration` instead of an end.
    pub fn insert_recurring_event(&self, values: &EventValues, duration: &str) -> Result<i64> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "INSERT INTO events (calendar_id, title, description, dtstart, duration, event_timezone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                values.calendar_id,
                values.title,
                values.description,
                values.dtstart,
                duration,
                values.event_timezone
            ],
        )
        .map_err(map_sql_error)?;
        Ok(conn.last_insert_rowid())
    }

    /// Time zone stored on an event row.
    pub fn event_timezone(&self, event_id: i64) -> Result<Option<String>> {
        let conn = self.db.get_connection()?;
        let zone: Option<Option<String>> = conn
            .query_row("SELECT event_timezone FROM events WHERE id = ?1", params![event_id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(map_sql_error)?;
        Ok(zone.flatten())
    }
}

fn calendar_from_row(row: &Row<'_>) -> rusqlite::Result<CalendarRow> {
    Ok(CalendarRow {
        id: row.get(0)?,
        display_name: row.get(1)?,
        access_level: row.get(2)?,
        account_name: row.get(3)?,
        owner_account: row.get(4)?,
    })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        calendar_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        dtstart: row.get(4)?,
        dtend: row.get(5)?,
    })
}

#[async_trait]
impl CalendarStore for SqliteCalendarStore {
    #[instrument(skip(self))]
    async fn query_calendars(&self) -> Result<Vec<CalendarRow>> {
        let conn = self.db.get_connection()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {CALENDAR_COLUMNS} FROM calendars ORDER BY id"))
            .map_err(map_sql_error)?;

        let rows = stmt
            .query_map([], calendar_from_row)
            .map_err(map_sql_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_sql_error)?;

        debug!(count = rows.len(), "queried calendars");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn query_calendar(&self, calendar_id: i64) -> Result<Option<CalendarRow>> {
        let conn = self.db.get_connection()?;
        conn.query_row(
            &format!("SELECT {CALENDAR_COLUMNS} FROM calendars WHERE id = ?1"),
            params![calendar_id],
            calendar_from_row,
        )
        .optional()
        .map_err(map_sql_error)
    }

    #[instrument(skip(self))]
    async fn query_events(&self, query: EventQuery) -> Result<Vec<EventRow>> {
        let conn = self.db.get_connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events
                 WHERE calendar_id = ?1
                   AND dtstart >= ?2
                   AND COALESCE(dtend, dtstart) <= ?3
                   AND deleted != 1
                 ORDER BY dtstart ASC"
            ))
            .map_err(map_sql_error)?;

        let rows = stmt
            .query_map(params![query.calendar_id, query.start_ms, query.end_ms], event_from_row)
            .map_err(map_sql_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_sql_error)?;

        debug!(count = rows.len(), "queried events");
        Ok(rows)
    }

    #[instrument(skip(self, values), fields(calendar_id = values.calendar_id))]
    async fn insert_event(&self, values: &EventValues) -> Result<ContentUri> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "INSERT INTO events (calendar_id, title, description, dtstart, dtend, event_timezone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                values.calendar_id,
                values.title,
                values.description,
                values.dtstart,
                values.dtend,
                values.event_timezone
            ],
        )
        .map_err(map_sql_error)?;

        Ok(ContentUri::events().with_appended_id(conn.last_insert_rowid()))
    }

    #[instrument(skip(self, values))]
    async fn update_event(&self, event_id: i64, values: &EventValues) -> Result<usize> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "UPDATE events
             SET calendar_id = ?1, title = ?2, description = ?3, dtstart = ?4, dtend = ?5,
                 event_timezone = ?6
             WHERE id = ?7 AND deleted = 0",
            params![
                values.calendar_id,
                values.title,
                values.description,
                values.dtstart,
                values.dtend,
                values.event_timezone,
                event_id
            ],
        )
        .map_err(map_sql_error)
    }

    #[instrument(skip(self))]
    async fn event_duration(&self, event_id: i64) -> Result<Option<String>> {
        let conn = self.db.get_connection()?;
        let duration: Option<Option<String>> = conn
            .query_row("SELECT duration FROM events WHERE id = ?1", params![event_id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(map_sql_error)?;
        Ok(duration.flatten())
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, event_id: i64) -> Result<usize> {
        let conn = self.db.get_connection()?;
        conn.execute("UPDATE events SET deleted = 1 WHERE id = ?1 AND deleted = 0", params![
            event_id
        ])
        .map_err(map_sql_error)
    }
}
