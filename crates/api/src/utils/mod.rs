//! Shared helpers for the method surface

pub mod logging;
