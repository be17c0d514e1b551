//! Scheduler error types

use std::time::Duration;

use calbridge_domain::BridgeError;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Operation timed out
    #[error("Operation timed out after {duration:?}")]
    Timeout {
        duration: Duration,
        #[source]
        source: Elapsed,
    },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(#[from] JoinError),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let bridge_err = match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                BridgeError::InvalidInput(err.to_string())
            }
            _ => BridgeError::Internal(err.to_string()),
        };
        InfraError(bridge_err)
    }
}

impl From<SchedulerError> for BridgeError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
