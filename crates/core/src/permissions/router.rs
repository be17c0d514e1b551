//! Routes permission-prompt answers back to the calls waiting on them

use std::sync::Arc;
use std::time::Duration;

use calbridge_domain::Reply;
use tracing::{debug, info, warn};

use super::cache::PendingRequestCache;
use super::request::{PermissionStatus, PromptState, RequestCode};
use crate::calendar::CalendarDelegate;

/// Entry point for prompt answers.
///
/// The router is the only component that consumes pending records. A
/// granted prompt re-enters the parked operation; a denied one completes
/// the call with an empty success.
pub struct PermissionResultRouter {
    delegate: Arc<CalendarDelegate>,
    pending: Arc<PendingRequestCache>,
}

impl PermissionResultRouter {
    pub fn new(delegate: Arc<CalendarDelegate>) -> Self {
        let pending = Arc::clone(delegate.pending_requests());
        Self { delegate, pending }
    }

    /// Handle the answer to the prompt issued with `request_code`.
    ///
    /// Always returns `true`. Codes this bridge never issued belong to other
    /// prompts on the same host channel and are ignored.
    pub async fn on_permission_result(
        &self,
        request_code: RequestCode,
        grant_results: &[PermissionStatus],
    ) -> bool {
        let Some(pending) = self.pending.take(request_code) else {
            debug!(request_code = %request_code, "ignoring permission result for unknown request code");
            return true;
        };

        let granted = grant_results.first() == Some(&PermissionStatus::Granted);
        let (request, result) = pending.into_parts();

        if granted {
            info!(request_code = %request_code, operation = %request.kind(), "calendar permissions granted, resuming");
            self.delegate.dispatch(request, result).await;
        } else {
            info!(request_code = %request_code, operation = %request.kind(), "calendar permissions denied");
            self.delegate.finish(&result, Reply::denied());
        }

        true
    }

    /// Complete every call parked longer than `ttl` as if its prompt had
    /// been denied. Returns how many calls were completed.
    pub fn expire_stale(&self, ttl: Duration) -> usize {
        let expired = self.pending.take_expired(ttl);

        for pending in &expired {
            warn!(
                request_code = %pending.request_code(),
                operation = %pending.kind(),
                ttl_secs = ttl.as_secs(),
                "permission prompt unanswered, expiring pending request"
            );
            self.delegate.finish(pending.result(), Reply::denied());
        }

        expired.len()
    }

    pub fn state(&self, request_code: RequestCode) -> PromptState {
        self.pending.state(request_code)
    }

    pub fn pending_requests(&self) -> &Arc<PendingRequestCache> {
        &self.pending
    }
}
