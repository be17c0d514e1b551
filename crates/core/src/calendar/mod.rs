//! Calendar operations, their ports and row mappers

pub mod delegate;
pub mod mapper;
pub mod ports;
pub mod result;

pub use delegate::{CalendarDelegate, Dispatch};
pub use ports::{CalendarStore, MethodResult, PermissionGate};
pub use result::ResultHandle;
