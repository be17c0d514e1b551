//! Host-driven permission gate
//!
//! The bridge never shows a dialog itself. `request_permissions` hands a
//! [`PermissionPrompt`] to the host over a channel; the host asks the user,
//! resolves the prompt, and feeds the resulting [`PermissionResult`] back
//! through the plugin's permission-result entry point.

use std::sync::Arc;

use calbridge_core::{PermissionGate, PermissionStatus, RequestCode};
use calbridge_domain::constants::{READ_CALENDAR_PERMISSION, WRITE_CALENDAR_PERMISSION};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Both permissions, in the order prompts request them.
pub const CALENDAR_PERMISSIONS: [&str; 2] = [WRITE_CALENDAR_PERMISSION, READ_CALENDAR_PERMISSION];

/// A prompt the host should show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPrompt {
    request_code: RequestCode,
}

impl PermissionPrompt {
    pub fn request_code(&self) -> RequestCode {
        self.request_code
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        &CALENDAR_PERMISSIONS
    }
}

/// Answer to a prompt, one grant flag per requested permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionResult {
    pub request_code: RequestCode,
    pub permissions: Vec<String>,
    pub grant_results: Vec<PermissionStatus>,
}

impl PermissionResult {
    /// Build a result from platform grant codes (`0` granted, anything else
    /// denied).
    pub fn from_codes(request_code: RequestCode, permissions: &[&str], codes: &[i32]) -> Self {
        Self {
            request_code,
            permissions: permissions.iter().map(|permission| (*permission).to_string()).collect(),
            grant_results: codes.iter().copied().map(PermissionStatus::from_code).collect(),
        }
    }
}

#[derive(Debug, Default)]
struct GrantState {
    read: bool,
    write: bool,
}

/// Gate whose grant state is owned by the host.
#[derive(Clone)]
pub struct HostPermissionGate {
    grants: Arc<RwLock<GrantState>>,
    prompts: mpsc::UnboundedSender<PermissionPrompt>,
}

impl HostPermissionGate {
    /// Create a gate with nothing granted, plus the receiver the host reads
    /// prompts from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PermissionPrompt>) {
        let (prompts, receiver) = mpsc::unbounded_channel();
        (Self { grants: Arc::new(RwLock::new(GrantState::default())), prompts }, receiver)
    }

    /// Record the current state of one permission. Unknown names are ignored.
    pub fn set_granted(&self, permission: &str, granted: bool) {
        let mut grants = self.grants.write();
        match permission {
            READ_CALENDAR_PERMISSION => grants.read = granted,
            WRITE_CALENDAR_PERMISSION => grants.write = granted,
            other => debug!(permission = other, "ignoring unrelated permission"),
        }
    }

    /// Record the user's answer to `prompt` and build the result to route.
    ///
    /// Missing flags count as denied.
    pub fn resolve(
        &self,
        prompt: &PermissionPrompt,
        grant_results: Vec<PermissionStatus>,
    ) -> PermissionResult {
        for (index, permission) in prompt.permissions().iter().enumerate() {
            let granted = grant_results.get(index) == Some(&PermissionStatus::Granted);
            self.set_granted(permission, granted);
        }

        PermissionResult {
            request_code: prompt.request_code(),
            permissions: prompt.permissions().iter().map(|p| (*p).to_string()).collect(),
            grant_results,
        }
    }
}

impl PermissionGate for HostPermissionGate {
    fn is_granted(&self) -> bool {
        let grants = self.grants.read();
        grants.read && grants.write
    }

    fn request_permissions(&self, request_code: RequestCode) {
        if self.prompts.send(PermissionPrompt { request_code }).is_err() {
            warn!(request_code = %request_code, "no host listening for permission prompts");
        }
    }
}

/// Gate for platforms that grant calendar access at install time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

impl PermissionGate for AlwaysGranted {
    fn is_granted(&self) -> bool {
        true
    }

    fn request_permissions(&self, request_code: RequestCode) {
        debug!(request_code = %request_code, "permission prompt requested on a pre-granted platform");
    }
}
