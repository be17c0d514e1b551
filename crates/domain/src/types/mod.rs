//! Domain types and models

pub mod calendar;
pub mod event;
pub mod reply;
pub mod rows;
pub mod uri;

pub use calendar::{AccessLevel, Calendar};
pub use event::{Event, EventQuery, EventValues};
pub use reply::{OperationKind, Payload, Reply};
pub use rows::{CalendarRow, EventRow};
pub use uri::ContentUri;
