//! # CalBridge Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The SQLite calendar store (r2d2 pool, schema migrations)
//! - Host-driven and pre-granted permission gates
//! - Configuration loading from environment and files
//! - Background expiry of unanswered permission prompts
//!
//! ## Architecture
//! - Implements traits defined in `calbridge-core`
//! - Contains all "impure" code (I/O, channels, timers)

pub mod config;
pub mod database;
pub mod errors;
pub mod permissions;
pub mod scheduling;

// Re-export commonly used items
pub use database::{DbManager, SqliteCalendarStore};
pub use errors::InfraError;
pub use permissions::{AlwaysGranted, HostPermissionGate, PermissionPrompt, PermissionResult};
pub use scheduling::{PendingRequestSweeper, PendingSweeperConfig, SchedulerError};
