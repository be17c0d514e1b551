use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calbridge_core::CalendarStore;
use calbridge_domain::{
    AccessLevel, BridgeError, CalendarRow, ContentUri, EventQuery, EventRow, EventValues,
    Result as DomainResult,
};

#[derive(Debug, Clone)]
struct StoredEvent {
    row: EventRow,
    duration: Option<String>,
    deleted: bool,
}

/// Store calls that can be made to fail one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMethod {
    QueryCalendars,
    QueryCalendar,
    QueryEvents,
    InsertEvent,
    UpdateEvent,
    EventDuration,
    DeleteEvent,
}

#[derive(Default)]
struct StoreState {
    calendars: Vec<CalendarRow>,
    events: Vec<StoredEvent>,
    next_event_id: i64,
    failing: bool,
    failing_methods: Vec<StoreMethod>,
    writes: usize,
    deletes: usize,
}

/// In-memory mock for `CalendarStore`.
///
/// Behaves like the provider for the columns the bridge touches: soft-deleted
/// rows are hidden, queries are ordered by start, and inserts hand back a
/// row URI. `fail_with_errors` makes every call fail; `fail_on` fails a
/// single method.
#[derive(Default, Clone)]
pub struct MockCalendarStore {
    state: Arc<Mutex<StoreState>>,
}

impl MockCalendarStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().next_event_id = 1;
        store
    }

    /// Seed a calendar row.
    pub fn with_calendar(self, id: i64, name: &str, access: AccessLevel) -> Self {
        self.state.lock().unwrap().calendars.push(CalendarRow {
            id,
            display_name: Some(name.to_string()),
            access_level: access.value(),
            account_name: Some("tester@example.com".into()),
            owner_account: Some("tester@example.com".into()),
        });
        self
    }

    /// Seed an event row; a `duration` marks it recurring.
    pub fn with_event(self, row: EventRow, duration: Option<&str>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_event_id = state.next_event_id.max(row.id + 1);
            state.events.push(StoredEvent {
                row,
                duration: duration.map(str::to_string),
                deleted: false,
            });
        }
        self
    }

    pub fn fail_with_errors(&self) {
        self.state.lock().unwrap().failing = true;
    }

    pub fn fail_on(&self, method: StoreMethod) {
        self.state.lock().unwrap().failing_methods.push(method);
    }

    /// Number of insert and update calls that reached the store.
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    /// Number of delete calls that reached the store.
    pub fn delete_count(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    pub fn event(&self, id: i64) -> Option<EventRow> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|stored| stored.row.id == id && !stored.deleted)
            .map(|stored| stored.row.clone())
    }

    fn check(&self, method: StoreMethod) -> DomainResult<()> {
        let state = self.state.lock().unwrap();
        if state.failing || state.failing_methods.contains(&method) {
            return Err(BridgeError::Database("calendar provider unavailable".into()));
        }
        Ok(())
    }
}

fn row_from_values(id: i64, values: &EventValues) -> EventRow {
    EventRow {
        id,
        calendar_id: values.calendar_id,
        title: Some(values.title.clone()),
        description: values.description.clone(),
        dtstart: values.dtstart,
        dtend: Some(values.dtend),
    }
}

#[async_trait]
impl CalendarStore for MockCalendarStore {
    async fn query_calendars(&self) -> DomainResult<Vec<CalendarRow>> {
        self.check(StoreMethod::QueryCalendars)?;
        Ok(self.state.lock().unwrap().calendars.clone())
    }

    async fn query_calendar(&self, calendar_id: i64) -> DomainResult<Option<CalendarRow>> {
        self.check(StoreMethod::QueryCalendar)?;
        Ok(self.state.lock().unwrap().calendars.iter().find(|row| row.id == calendar_id).cloned())
    }

    async fn query_events(&self, query: EventQuery) -> DomainResult<Vec<EventRow>> {
        self.check(StoreMethod::QueryEvents)?;
        let mut rows: Vec<EventRow> = self
            .state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|stored| !stored.deleted)
            .map(|stored| stored.row.clone())
            .filter(|row| {
                row.calendar_id == query.calendar_id
                    && row.dtstart >= query.start_ms
                    && row.dtend.unwrap_or(row.dtstart) <= query.end_ms
            })
            .collect();
        rows.sort_by_key(|row| row.dtstart);
        Ok(rows)
    }

    async fn insert_event(&self, values: &EventValues) -> DomainResult<ContentUri> {
        self.check(StoreMethod::InsertEvent)?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_event_id;
        state.next_event_id += 1;
        state.writes += 1;
        state.events.push(StoredEvent {
            row: row_from_values(id, values),
            duration: None,
            deleted: false,
        });
        Ok(ContentUri::events().with_appended_id(id))
    }

    async fn update_event(&self, event_id: i64, values: &EventValues) -> DomainResult<usize> {
        self.check(StoreMethod::UpdateEvent)?;
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let Some(stored) = state.events.iter_mut().find(|stored| stored.row.id == event_id) else {
            return Ok(0);
        };
        stored.row = row_from_values(event_id, values);
        Ok(1)
    }

    async fn event_duration(&self, event_id: i64) -> DomainResult<Option<String>> {
        self.check(StoreMethod::EventDuration)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|stored| stored.row.id == event_id)
            .and_then(|stored| stored.duration.clone()))
    }

    async fn delete_event(&self, event_id: i64) -> DomainResult<usize> {
        self.check(StoreMethod::DeleteEvent)?;
        let mut state = self.state.lock().unwrap();
        state.deletes += 1;
        let Some(stored) =
            state.events.iter_mut().find(|stored| stored.row.id == event_id && !stored.deleted)
        else {
            return Ok(0);
        };
        stored.deleted = true;
        Ok(1)
    }
}
