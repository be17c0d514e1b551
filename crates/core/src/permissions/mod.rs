//! Permission deferral: parked calls, their request codes and the router
//! that resumes them

pub mod cache;
pub mod request;
pub mod router;

pub use cache::PendingRequestCache;
pub use request::{
    CalendarRequest, PendingOperation, PermissionStatus, PromptState, RequestCode,
};
pub use router::PermissionResultRouter;
