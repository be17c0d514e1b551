//! Database implementations

pub mod calendar_store;
pub mod manager;

pub use calendar_store::SqliteCalendarStore;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
