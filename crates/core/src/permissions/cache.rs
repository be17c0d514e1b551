//! Pending-request cache
//!
//! Owns every call parked behind a permission prompt. Request codes are
//! allocated as `max(live keys, last issued) + 1`, so they increase strictly
//! and never repeat within a process. All reads and writes of the map and
//! the high-water mark happen under one lock.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use calbridge_common::{Clock, SystemClock};
use calbridge_domain::constants::REQUEST_CODES_EXHAUSTED_MESSAGE;
use calbridge_domain::{CalendarError, OperationKind};
use parking_lot::Mutex;
use tracing::debug;

use super::request::{CalendarRequest, PendingOperation, PromptState, RequestCode};
use crate::calendar::ResultHandle;

#[derive(Debug, Default)]
struct CacheState {
    entries: BTreeMap<RequestCode, PendingOperation>,
    /// Highest code ever issued.
    high_water: Option<RequestCode>,
}

impl CacheState {
    fn next_code(&self) -> Option<RequestCode> {
        let last_key = self.entries.keys().next_back().copied();
        match last_key.max(self.high_water) {
            Some(code) => code.next(),
            None => Some(RequestCode::FIRST),
        }
    }
}

/// Map from request code to the parked call it belongs to.
pub struct PendingRequestCache {
    state: Mutex<CacheState>,
    clock: Arc<dyn Clock>,
}

impl PendingRequestCache {
    /// Create an empty cache using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache with a custom clock (useful for testing expiry)
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { state: Mutex::new(CacheState::default()), clock }
    }

    /// Park a call under a fresh request code.
    ///
    /// # Errors
    /// Returns `CalendarError::Exception` once every positive `i32` code has
    /// been issued.
    pub fn allocate(
        &self,
        request: CalendarRequest,
        result: ResultHandle,
    ) -> Result<RequestCode, CalendarError> {
        let created_at = self.clock.now();
        let mut state = self.state.lock();

        let code = state
            .next_code()
            .ok_or_else(|| CalendarError::Exception(REQUEST_CODES_EXHAUSTED_MESSAGE.to_string()))?;

        let kind = request.kind();
        state.entries.insert(code, PendingOperation::new(code, request, result, created_at));
        state.high_water = Some(code);

        debug!(request_code = %code, operation = %kind, pending = state.entries.len(), "parked calendar request");
        Ok(code)
    }

    /// Remove and return the record for `code`.
    ///
    /// Absence is expected: prompts issued elsewhere in the host share the
    /// same result channel.
    pub fn take(&self, code: RequestCode) -> Option<PendingOperation> {
        self.state.lock().entries.remove(&code)
    }

    /// Drop every record delivering to `result`; returns how many were removed.
    pub fn evict_by_result_handle(&self, result: &ResultHandle) -> usize {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|_, pending| pending.result() != result);
        let evicted = before - state.entries.len();

        if evicted > 0 {
            debug!(handle = result.id(), evicted, "evicted stale pending requests");
        }
        evicted
    }

    /// Remove and return every record older than `ttl`.
    pub fn take_expired(&self, ttl: Duration) -> Vec<PendingOperation> {
        let now = self.clock.now();
        let mut state = self.state.lock();

        let expired: Vec<RequestCode> = state
            .entries
            .iter()
            .filter(|(_, pending)| now.saturating_duration_since(pending.created_at()) >= ttl)
            .map(|(code, _)| *code)
            .collect();

        expired.iter().filter_map(|code| state.entries.remove(code)).collect()
    }

    /// Where `code` is in its lifecycle.
    pub fn state(&self, code: RequestCode) -> PromptState {
        let state = self.state.lock();
        if state.entries.contains_key(&code) {
            PromptState::AwaitingPrompt
        } else if state.high_water.is_some_and(|issued| code <= issued) && code >= RequestCode::FIRST
        {
            PromptState::Resolved
        } else {
            PromptState::Idle
        }
    }

    /// Codes and kinds of the parked calls, in code order.
    pub fn pending(&self) -> Vec<(RequestCode, OperationKind)> {
        self.state.lock().entries.iter().map(|(code, pending)| (*code, pending.kind())).collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PendingRequestCache {
    fn default() -> Self {
        Self::new()
    }
}
