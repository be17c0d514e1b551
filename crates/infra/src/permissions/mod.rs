//! Permission gates for hosts with and without runtime permissions

pub mod host_gate;

pub use host_gate::{AlwaysGranted, HostPermissionGate, PermissionPrompt, PermissionResult};
