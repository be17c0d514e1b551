//! Result handles identifying one in-flight method call

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use calbridge_domain::Reply;

use super::ports::MethodResult;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Delivery handle for one method call.
///
/// Clones refer to the same call. Equality is by handle identity, which is
/// what pending-request eviction keys on.
#[derive(Clone)]
pub struct ResultHandle {
    id: u64,
    sink: Arc<dyn MethodResult>,
}

impl ResultHandle {
    pub fn new(sink: Arc<dyn MethodResult>) -> Self {
        Self { id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed), sink }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn deliver(&self, reply: Reply) {
        self.sink.deliver(reply);
    }
}

impl PartialEq for ResultHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResultHandle {}

impl fmt::Debug for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultHandle").field("id", &self.id).finish_non_exhaustive()
    }
}
