//! Method-channel surface types
//!
//! A [`MethodCall`] is what the calling runtime sends: a method name plus a
//! JSON argument map. A [`ChannelReply`] is what goes back. Replies travel
//! through an [`OneshotResult`], which resolves exactly once no matter how
//! many times the core tries to deliver.

use std::sync::Arc;

use calbridge_core::{MethodResult, ResultHandle};
use calbridge_domain::{ErrorCode, Payload, Reply};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

/// An incoming method invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self { method: method.into(), arguments }
    }

    /// A call without arguments.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Value::Object(Map::new()))
    }

    /// Raw argument value for `key`. JSON `null` counts as absent.
    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key).filter(|value| !value.is_null())
    }

    pub fn has_argument(&self, key: &str) -> bool {
        self.argument(key).is_some()
    }
}

/// The single answer to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelReply {
    /// `None` is the empty success sent after a denied prompt.
    Success { result: Option<Value> },
    Error { code: String, message: String },
    NotImplemented,
}

impl ChannelReply {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error { code: code.as_str().to_string(), message: message.into() }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            Self::Success { result } => result.as_ref(),
            _ => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<Reply> for ChannelReply {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Success(None) => Self::Success { result: None },
            Reply::Success(Some(payload)) => match encode_payload(&payload) {
                Ok(value) => Self::Success { result: Some(value) },
                Err(err) => {
                    error!(error = %err, "failed to encode reply payload");
                    Self::error(ErrorCode::Exception, err.to_string())
                }
            },
            Reply::Error(err) => Self::error(err.code(), err.message()),
        }
    }
}

/// Calendars and events cross the channel as JSON strings; identifiers and
/// flags as plain values.
fn encode_payload(payload: &Payload) -> serde_json::Result<Value> {
    Ok(match payload {
        Payload::Calendars(calendars) => Value::String(serde_json::to_string(calendars)?),
        Payload::Calendar(calendar) => Value::String(serde_json::to_string(calendar)?),
        Payload::Events(events) => Value::String(serde_json::to_string(events)?),
        Payload::EventId(id) => Value::String(id.clone()),
        Payload::Deleted(deleted) => Value::Bool(*deleted),
    })
}

/// Result sink backed by a oneshot channel.
pub struct OneshotResult {
    method: String,
    sender: Mutex<Option<oneshot::Sender<ChannelReply>>>,
}

impl OneshotResult {
    /// A fresh sink for one call of `method`, with the receiving end.
    pub fn channel(method: &str) -> (Arc<Self>, oneshot::Receiver<ChannelReply>) {
        let (sender, receiver) = oneshot::channel();
        let sink = Arc::new(Self { method: method.to_string(), sender: Mutex::new(Some(sender)) });
        (sink, receiver)
    }

    /// Wrap this sink in a handle the core can deliver through.
    pub fn handle(self: &Arc<Self>) -> ResultHandle {
        ResultHandle::new(Arc::clone(self) as Arc<dyn MethodResult>)
    }

    /// Resolve directly, without going through the core.
    pub fn send(&self, reply: ChannelReply) {
        let Some(sender) = self.sender.lock().take() else {
            warn!(method = %self.method, "method call already answered, dropping reply");
            return;
        };

        if sender.send(reply).is_err() {
            debug!(method = %self.method, "caller stopped waiting for the reply");
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl MethodResult for OneshotResult {
    fn deliver(&self, reply: Reply) {
        self.send(ChannelReply::from(reply));
    }
}
