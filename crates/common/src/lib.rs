//! Common utilities shared across CalBridge crates.
//!
//! - [`time`]: clock abstraction with a real and a mock implementation
//! - `testing` (feature `test-utils`): temporary directory helpers

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use time::{Clock, MockClock, SystemClock};
