//! Method handlers - runtime channel to calendar delegate bridge

pub mod calendar;

pub use calendar::{decode, execute, CommandError};
