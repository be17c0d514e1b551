use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use calbridge_core::{MethodResult, PermissionGate, RequestCode, ResultHandle};
use calbridge_domain::Reply;

/// Permission gate whose grant state is flipped by the test.
///
/// Records every request code it was asked to prompt for.
#[derive(Default)]
pub struct ScriptedPermissionGate {
    granted: AtomicBool,
    prompts: Mutex<Vec<RequestCode>>,
}

impl ScriptedPermissionGate {
    pub fn granted() -> Arc<Self> {
        let gate = Self::default();
        gate.set_granted(true);
        Arc::new(gate)
    }

    pub fn denied() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<RequestCode> {
        self.prompts.lock().unwrap().clone()
    }
}

impl PermissionGate for ScriptedPermissionGate {
    fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn request_permissions(&self, request_code: RequestCode) {
        self.prompts.lock().unwrap().push(request_code);
    }
}

/// Reply sink that keeps every delivery for later assertions.
#[derive(Default)]
pub struct RecordingResult {
    replies: Mutex<Vec<Reply>>,
}

impl RecordingResult {
    /// A fresh sink plus a handle delivering into it.
    pub fn handle() -> (Arc<Self>, ResultHandle) {
        let sink = Arc::new(Self::default());
        let handle = ResultHandle::new(sink.clone());
        (sink, handle)
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }

    /// The only reply delivered; panics unless exactly one arrived.
    pub fn single(&self) -> Reply {
        let replies = self.replies();
        assert_eq!(replies.len(), 1, "expected exactly one delivery, got {replies:?}");
        replies.into_iter().next().unwrap()
    }
}

impl MethodResult for RecordingResult {
    fn deliver(&self, reply: Reply) {
        self.replies.lock().unwrap().push(reply);
    }
}
