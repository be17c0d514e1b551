use std::time::Duration;

use calbridge_core::Dispatch;
use once_cell::sync::OnceCell;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::channel::ChannelReply;

static TRACING: OnceCell<()> = OnceCell::new();

/// Install a formatted subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once. If the host already installed a global
/// subscriber, that one is kept.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
    });
}

/// How a method call left the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodOutcome {
    Succeeded,
    Failed(&'static str),
    Deferred,
}

impl MethodOutcome {
    /// Outcome of a call that went through the delegate.
    pub fn of_dispatch(dispatch: &Dispatch) -> Self {
        match dispatch {
            Dispatch::Deferred(_) => Self::Deferred,
            Dispatch::Immediate(reply) => match reply.error() {
                Some(err) => Self::Failed(err.code().as_str()),
                None => Self::Succeeded,
            },
        }
    }

    /// Outcome of a call answered before reaching the delegate.
    pub fn of_reply(reply: &ChannelReply) -> Self {
        match reply {
            ChannelReply::Success { .. } => Self::Succeeded,
            ChannelReply::Error { .. } => Self::Failed("INVALID_ARGUMENT"),
            ChannelReply::NotImplemented => Self::Failed("NOT_IMPLEMENTED"),
        }
    }
}

/// Log the outcome of one method call with structured fields.
///
/// `method` is the wire name as received; unknown names are logged too.
#[inline]
pub fn log_method_execution(method: &str, outcome: MethodOutcome, elapsed: Duration) {
    let duration_ms = elapsed.as_millis() as u64;

    match outcome {
        MethodOutcome::Succeeded => info!(method, duration_ms, "method_execution_success"),
        MethodOutcome::Deferred => info!(method, duration_ms, "method_execution_deferred"),
        MethodOutcome::Failed(code) => {
            warn!(method, duration_ms, error_code = code, "method_execution_failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use calbridge_core::RequestCode;
    use calbridge_domain::{CalendarError, ErrorCode, Reply};

    use super::*;

    #[test]
    fn outcome_follows_dispatch() {
        assert_eq!(
            MethodOutcome::of_dispatch(&Dispatch::Deferred(RequestCode::FIRST)),
            MethodOutcome::Deferred
        );
        assert_eq!(
            MethodOutcome::of_dispatch(&Dispatch::Immediate(Reply::denied())),
            MethodOutcome::Succeeded
        );
        assert_eq!(
            MethodOutcome::of_dispatch(&Dispatch::Immediate(Reply::Error(
                CalendarError::calendar_not_found("4")
            ))),
            MethodOutcome::Failed("CALENDAR_RETRIEVAL_FAILURE")
        );
    }

    #[test]
    fn early_replies_are_labelled() {
        let invalid = ChannelReply::error(ErrorCode::InvalidArgument, "Argument calendarId is missing");
        assert_eq!(MethodOutcome::of_reply(&invalid), MethodOutcome::Failed("INVALID_ARGUMENT"));
        assert_eq!(
            MethodOutcome::of_reply(&ChannelReply::NotImplemented),
            MethodOutcome::Failed("NOT_IMPLEMENTED")
        );
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
        log_method_execution("retrieveCalendars", MethodOutcome::Succeeded, Duration::from_millis(3));
    }
}
