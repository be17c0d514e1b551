//! # CalBridge Domain
//!
//! Business domain types for the device calendar bridge.
//!
//! This crate contains:
//! - Calendar and event records plus the native row shapes they come from
//! - The user-facing error taxonomy and the ambient bridge error
//! - Configuration structures
//! - Provider constants and fixed error messages
//!
//! ## Architecture
//! - No dependencies on other CalBridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
