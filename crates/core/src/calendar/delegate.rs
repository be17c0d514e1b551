//! Calendar delegate - permission-gated calendar operations
//!
//! Every operation either runs against the store immediately or, when the
//! calendar permissions are missing, parks its arguments in the
//! [`PendingRequestCache`] and asks the [`PermissionGate`] for a prompt. The
//! [`PermissionResultRouter`](crate::permissions::PermissionResultRouter)
//! resumes parked calls once the prompt is answered.

use std::sync::Arc;

use calbridge_domain::constants::{
    CALENDAR_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE, CREATE_EVENT_ARGUMENTS_NOT_VALID_MESSAGE,
    DEFAULT_TIME_ZONE, DELETING_RECURRING_EVENT_NOT_SUPPORTED_MESSAGE,
    EVENTS_START_DATE_LARGER_THAN_END_DATE_MESSAGE, EVENT_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE,
};
use calbridge_domain::{
    BridgeError, Calendar, CalendarError, Event, EventQuery, OperationKind, Payload, Reply,
};
use tracing::{debug, error, info, instrument, warn};

use super::mapper;
use super::ports::{CalendarStore, PermissionGate};
use super::result::ResultHandle;
use crate::permissions::{CalendarRequest, PendingRequestCache, RequestCode};

type OperationResult = Result<Payload, CalendarError>;

/// Outcome of invoking an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The reply has already been delivered through the result handle.
    Immediate(Reply),
    /// Parked behind a permission prompt issued with this request code.
    Deferred(RequestCode),
}

impl Dispatch {
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            Self::Immediate(reply) => Some(reply),
            Self::Deferred(_) => None,
        }
    }

    pub fn request_code(&self) -> Option<RequestCode> {
        match self {
            Self::Deferred(code) => Some(*code),
            Self::Immediate(_) => None,
        }
    }

    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

/// Runs calendar operations behind the permission gate.
pub struct CalendarDelegate {
    store: Arc<dyn CalendarStore>,
    gate: Arc<dyn PermissionGate>,
    pending: Arc<PendingRequestCache>,
    time_zone: String,
}

impl CalendarDelegate {
    /// Create a delegate writing events in the default time zone.
    pub fn new(
        store: Arc<dyn CalendarStore>,
        gate: Arc<dyn PermissionGate>,
        pending: Arc<PendingRequestCache>,
    ) -> Self {
        Self { store, gate, pending, time_zone: DEFAULT_TIME_ZONE.to_string() }
    }

    /// Time zone recorded on every event written.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// Cache holding calls parked behind a prompt.
    pub fn pending_requests(&self) -> &Arc<PendingRequestCache> {
        &self.pending
    }

    pub async fn retrieve_calendars(&self, result: ResultHandle) -> Dispatch {
        self.dispatch(CalendarRequest::RetrieveCalendars, result).await
    }

    pub async fn retrieve_calendar(&self, calendar_id: &str, result: ResultHandle) -> Dispatch {
        let request = CalendarRequest::RetrieveCalendar { calendar_id: calendar_id.to_string() };
        self.dispatch(request, result).await
    }

    pub async fn retrieve_events(
        &self,
        calendar_id: &str,
        start_ms: i64,
        end_ms: i64,
        result: ResultHandle,
    ) -> Dispatch {
        let request = CalendarRequest::RetrieveEvents {
            calendar_id: calendar_id.to_string(),
            start_ms,
            end_ms,
        };
        self.dispatch(request, result).await
    }

    /// Insert `event` when it has no id, otherwise update it in place.
    pub async fn create_or_update_event(
        &self,
        calendar_id: &str,
        event: Option<Event>,
        result: ResultHandle,
    ) -> Dispatch {
        let request =
            CalendarRequest::CreateOrUpdateEvent { calendar_id: calendar_id.to_string(), event };
        self.dispatch(request, result).await
    }

    pub async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        result: ResultHandle,
    ) -> Dispatch {
        let request = CalendarRequest::DeleteEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        };
        self.dispatch(request, result).await
    }

    /// Run `request` through the permission gate.
    ///
    /// This is also the re-entry point for calls resumed after a grant.
    #[instrument(skip_all, fields(operation = %request.kind(), handle = result.id()))]
    pub async fn dispatch(&self, request: CalendarRequest, result: ResultHandle) -> Dispatch {
        if !self.gate.is_granted() {
            return self.defer(request, result);
        }

        let kind = request.kind();
        let reply = match self.run(request).await {
            Ok(payload) => Reply::from(payload),
            Err(err) => {
                warn!(operation = %kind, code = %err.code(), error = %err, "calendar operation failed");
                Reply::Error(err)
            }
        };
        self.finish(&result, reply)
    }

    /// Deliver the single reply for `result` and drop any records still
    /// pointing at it.
    pub(crate) fn finish(&self, result: &ResultHandle, reply: Reply) -> Dispatch {
        result.deliver(reply.clone());
        self.pending.evict_by_result_handle(result);
        Dispatch::Immediate(reply)
    }

    fn defer(&self, request: CalendarRequest, result: ResultHandle) -> Dispatch {
        let kind = request.kind();
        match self.pending.allocate(request, result.clone()) {
            Ok(code) => {
                info!(operation = %kind, request_code = %code, "calendar permissions missing, prompting");
                self.gate.request_permissions(code);
                Dispatch::Deferred(code)
            }
            Err(err) => {
                error!(operation = %kind, error = %err, "could not park calendar request");
                self.finish(&result, Reply::Error(err))
            }
        }
    }

    async fn run(&self, request: CalendarRequest) -> OperationResult {
        match request {
            CalendarRequest::RetrieveCalendars => self.list_calendars().await,
            CalendarRequest::RetrieveCalendar { calendar_id } => {
                self.get_calendar(&calendar_id).await
            }
            CalendarRequest::RetrieveEvents { calendar_id, start_ms, end_ms } => {
                self.list_events(&calendar_id, start_ms, end_ms).await
            }
            CalendarRequest::CreateOrUpdateEvent { calendar_id, event } => {
                self.upsert_event(&calendar_id, event).await
            }
            CalendarRequest::DeleteEvent { calendar_id, event_id } => {
                self.remove_event(&calendar_id, &event_id).await
            }
        }
    }

    async fn list_calendars(&self) -> OperationResult {
        let rows = self
            .store
            .query_calendars()
            .await
            .map_err(|err| store_failure(OperationKind::ListCalendars, err))?;

        let calendars: Vec<Calendar> = rows.iter().map(mapper::parse_calendar).collect();
        debug!(count = calendars.len(), "retrieved calendars");
        Ok(Payload::Calendars(calendars))
    }

    async fn get_calendar(&self, calendar_id: &str) -> OperationResult {
        let id = mapper::parse_calendar_id(calendar_id).ok_or_else(|| {
            CalendarError::InvalidArgument(CALENDAR_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE.into())
        })?;

        let row = self
            .store
            .query_calendar(id)
            .await
            .map_err(|err| store_failure(OperationKind::GetCalendar, err))?;

        row.map(|row| Payload::Calendar(mapper::parse_calendar(&row)))
            .ok_or_else(|| CalendarError::calendar_not_found(calendar_id))
    }

    /// Calendar lookup on behalf of another operation.
    ///
    /// Malformed ids, missing rows and store failures all surface as the
    /// same retrieval failure; the lookup itself never reports an error.
    async fn resolve_calendar(&self, calendar_id: &str) -> Result<(i64, Calendar), CalendarError> {
        let not_found = || CalendarError::calendar_not_found(calendar_id);
        let id = mapper::parse_calendar_id(calendar_id).ok_or_else(not_found)?;

        match self.store.query_calendar(id).await {
            Ok(Some(row)) => Ok((id, mapper::parse_calendar(&row))),
            Ok(None) => Err(not_found()),
            Err(err) => {
                error!(calendar_id, error = %err, "calendar lookup failed");
                Err(not_found())
            }
        }
    }

    async fn list_events(&self, calendar_id: &str, start_ms: i64, end_ms: i64) -> OperationResult {
        // An inverted range fails regardless of whether the calendar exists.
        if start_ms > end_ms {
            return Err(CalendarError::EventsRetrievalFailure(
                EVENTS_START_DATE_LARGER_THAN_END_DATE_MESSAGE.into(),
            ));
        }

        let (calendar_id, _) = self.resolve_calendar(calendar_id).await?;

        let rows = self
            .store
            .query_events(EventQuery { calendar_id, start_ms, end_ms })
            .await
            .map_err(|err| store_failure(OperationKind::ListEvents, err))?;

        let events: Vec<Event> = rows.iter().map(mapper::parse_event).collect();
        debug!(calendar_id, count = events.len(), "retrieved events");
        Ok(Payload::Events(events))
    }

    async fn upsert_event(&self, calendar_id: &str, event: Option<Event>) -> OperationResult {
        let event = event.ok_or_else(|| {
            CalendarError::EventCreationFailure(CREATE_EVENT_ARGUMENTS_NOT_VALID_MESSAGE.into())
        })?;
        let calendar = mapper::parse_calendar_id(calendar_id).ok_or_else(|| {
            CalendarError::InvalidArgument(CALENDAR_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE.into())
        })?;
        let existing = mapper::existing_event_id(&event)?;

        let values = mapper::event_values(calendar, &event, &self.time_zone);
        let event_id = match existing {
            None => {
                let uri = self
                    .store
                    .insert_event(&values)
                    .await
                    .map_err(|err| store_failure(OperationKind::UpsertEvent, err))?;
                mapper::inserted_event_id(&uri)?
            }
            Some(event_id) => {
                let updated = self
                    .store
                    .update_event(event_id, &values)
                    .await
                    .map_err(|err| store_failure(OperationKind::UpsertEvent, err))?;
                if updated == 0 {
                    warn!(event_id, "update matched no event rows");
                }
                event_id
            }
        };

        info!(calendar_id = calendar, event_id, inserted = existing.is_none(), "event saved");
        Ok(Payload::EventId(event_id.to_string()))
    }

    async fn remove_event(&self, calendar_id: &str, event_id: &str) -> OperationResult {
        let (_, calendar) = self.resolve_calendar(calendar_id).await?;
        if calendar.is_read_only {
            return Err(CalendarError::calendar_read_only(calendar_id));
        }

        let event_id = mapper::parse_event_id(event_id).ok_or_else(|| {
            CalendarError::InvalidArgument(EVENT_ID_INVALID_ARGUMENT_NOT_A_NUMBER_MESSAGE.into())
        })?;

        let duration = self
            .store
            .event_duration(event_id)
            .await
            .map_err(|err| store_failure(OperationKind::DeleteEvent, err))?;
        if mapper::is_recurring(duration.as_deref()) {
            return Err(CalendarError::DeletingRecurringEventNotSupported(
                DELETING_RECURRING_EVENT_NOT_SUPPORTED_MESSAGE.into(),
            ));
        }

        let removed = self
            .store
            .delete_event(event_id)
            .await
            .map_err(|err| store_failure(OperationKind::DeleteEvent, err))?;

        info!(event_id, removed, "event deleted");
        Ok(Payload::Deleted(removed > 0))
    }
}

fn store_failure(kind: OperationKind, err: BridgeError) -> CalendarError {
    error!(operation = %kind, error = %err, "calendar store call failed");
    CalendarError::from(err)
}
