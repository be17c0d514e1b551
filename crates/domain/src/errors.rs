//! Error types used throughout the bridge
//!
//! Two layers live here:
//! - [`BridgeError`] is the ambient error of ports, adapters and
//!   configuration loading.
//! - [`CalendarError`] is the fixed, user-facing taxonomy delivered through a
//!   method result handle. Every variant maps onto exactly one [`ErrorCode`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for infrastructure and port failures
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// The bare message without the category prefix.
    ///
    /// Native-layer failures are reported to callers with their message
    /// passed through verbatim, so the prefix used by `Display` is dropped.
    pub fn message(&self) -> &str {
        match self {
            Self::Database(msg)
            | Self::Config(msg)
            | Self::Platform(msg)
            | Self::NotFound(msg)
            | Self::InvalidInput(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Stable error codes understood by the calling runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Exception,
    InvalidArgument,
    CalendarRetrievalFailure,
    EventsRetrievalFailure,
    CalendarIsReadOnly,
    EventCreationFailure,
    DeletingRecurringEventNotSupported,
}

impl ErrorCode {
    /// Wire representation of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exception => "EXCEPTION",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::CalendarRetrievalFailure => "CALENDAR_RETRIEVAL_FAILURE",
            Self::EventsRetrievalFailure => "EVENTS_RETRIEVAL_FAILURE",
            Self::CalendarIsReadOnly => "CALENDAR_IS_READ_ONLY",
            Self::EventCreationFailure => "EVENT_CREATION_FAILURE",
            Self::DeletingRecurringEventNotSupported => "DELETING_RECURRING_EVENT_NOT_SUPPORTED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing calendar error delivered through a result handle.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", content = "message", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarError {
    /// Unexpected native-layer failure; message passed through verbatim.
    #[error("{0}")]
    Exception(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    CalendarRetrievalFailure(String),

    #[error("{0}")]
    EventsRetrievalFailure(String),

    #[error("{0}")]
    CalendarIsReadOnly(String),

    #[error("{0}")]
    EventCreationFailure(String),

    #[error("{0}")]
    DeletingRecurringEventNotSupported(String),
}

impl CalendarError {
    /// The error code for this variant.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Exception(_) => ErrorCode::Exception,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::CalendarRetrievalFailure(_) => ErrorCode::CalendarRetrievalFailure,
            Self::EventsRetrievalFailure(_) => ErrorCode::EventsRetrievalFailure,
            Self::CalendarIsReadOnly(_) => ErrorCode::CalendarIsReadOnly,
            Self::EventCreationFailure(_) => ErrorCode::EventCreationFailure,
            Self::DeletingRecurringEventNotSupported(_) => {
                ErrorCode::DeletingRecurringEventNotSupported
            }
        }
    }

    /// The human readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Exception(msg)
            | Self::InvalidArgument(msg)
            | Self::CalendarRetrievalFailure(msg)
            | Self::EventsRetrievalFailure(msg)
            | Self::CalendarIsReadOnly(msg)
            | Self::EventCreationFailure(msg)
            | Self::DeletingRecurringEventNotSupported(msg) => msg,
        }
    }

    /// Retrieval failure for a calendar that could not be found.
    pub fn calendar_not_found(calendar_id: &str) -> Self {
        Self::CalendarRetrievalFailure(format!(
            "Couldn't retrieve the Calendar with ID {calendar_id}"
        ))
    }

    /// Precondition failure for a calendar the caller may not write to.
    pub fn calendar_read_only(calendar_id: &str) -> Self {
        Self::CalendarIsReadOnly(format!("Calendar with ID {calendar_id} is read only"))
    }
}

impl From<BridgeError> for CalendarError {
    fn from(value: BridgeError) -> Self {
        Self::Exception(value.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_as_wire_strings() {
        assert_eq!(ErrorCode::Exception.as_str(), "EXCEPTION");
        assert_eq!(
            CalendarError::DeletingRecurringEventNotSupported(String::new()).code().to_string(),
            "DELETING_RECURRING_EVENT_NOT_SUPPORTED"
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::CalendarIsReadOnly).unwrap(),
            "\"CALENDAR_IS_READ_ONLY\""
        );
    }

    #[test]
    fn bridge_error_converts_to_exception_with_verbatim_message() {
        let err = CalendarError::from(BridgeError::Database("disk I/O error".into()));
        assert_eq!(err.code(), ErrorCode::Exception);
        assert_eq!(err.message(), "disk I/O error");
    }

    #[test]
    fn not_found_helper_mentions_identifier() {
        let err = CalendarError::calendar_not_found("17");
        assert_eq!(err.code(), ErrorCode::CalendarRetrievalFailure);
        assert!(err.message().ends_with("ID 17"));
    }
}
