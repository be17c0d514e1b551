//! # CalBridge Core
//!
//! Permission-deferral protocol and calendar operations - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces for the calendar store, the permission gate and reply
//!   delivery
//! - The pending-request cache and the permission-result router
//! - The calendar delegate running the five calendar operations
//! - Row mappers
//!
//! ## Architecture Principles
//! - Only depends on `calbridge-common` and `calbridge-domain`
//! - No database, channel, or platform code
//! - All external dependencies via traits

pub mod calendar;
pub mod permissions;

pub use calendar::{
    CalendarDelegate, CalendarStore, Dispatch, MethodResult, PermissionGate, ResultHandle,
};
pub use permissions::{
    CalendarRequest, PendingOperation, PendingRequestCache, PermissionResultRouter,
    PermissionStatus, PromptState, RequestCode,
};
