//! Shared test helpers for `calbridge-core` integration tests.
//!
//! Lightweight in-memory doubles for the calendar store, the permission gate
//! and the reply sink, so tests can focus on the deferral protocol.

#![allow(dead_code)]

pub mod calendar;
pub mod permissions;
