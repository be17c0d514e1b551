//! # CalBridge API
//!
//! Method-call surface of the calendar bridge.
//!
//! This crate contains:
//! - The method-channel types (calls, replies, one-shot result sinks)
//! - Decoding of the five calendar methods and their arguments
//! - The plugin context (dependency wiring from configuration)
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the ports of `core` to the adapters of `infra`
//! - Hosts hand method calls and permission results to [`CalendarPlugin`]

pub mod channel;
pub mod commands;
pub mod context;
pub mod utils;

pub use channel::{ChannelReply, MethodCall, OneshotResult};
pub use context::{CalendarPlugin, HostBinding, PendingReply};
pub use utils::logging::init_tracing;
