//! Scheduling infrastructure for background maintenance
//!
//! Schedulers follow the same runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on shutdown

pub mod error;
pub mod pending_sweeper;

pub use error::{SchedulerError, SchedulerResult};
pub use pending_sweeper::{PendingRequestSweeper, PendingSweeperConfig};
