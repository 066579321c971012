//! The JSON-RPC message shapes and the identifiers that thread through the
//! dispatcher.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::any_value::AnyValue;
use crate::error::LspError;

/// A client-supplied request id: `integer | string` in JSON-RPC.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestId {
    Int(i64),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Int(i) => write!(f, "{i}"),
            RequestId::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// A response id additionally permits `null`, used when a parse error left
/// no recoverable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseId {
    Int(i64),
    String(String),
    Null,
}

impl From<RequestId> for ResponseId {
    fn from(id: RequestId) -> Self {
        match id {
            RequestId::Int(i) => ResponseId::Int(i),
            RequestId::String(s) => ResponseId::String(s),
        }
    }
}

/// `params` is always an array or an object on the wire, never a bare
/// scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageParams {
    Array(Vec<AnyValue>),
    Object(indexmap::IndexMap<String, AnyValue>),
}

impl MessageParams {
    pub fn from_any(value: AnyValue) -> Result<MessageParams, LspError> {
        match value {
            AnyValue::Array(items) => Ok(MessageParams::Array(items)),
            AnyValue::Object(object) => Ok(MessageParams::Object(object)),
            other => Err(LspError::InvalidRequest(format!(
                "params must be an array or object, found {}",
                other.tag()
            ))),
        }
    }

    pub fn into_any(self) -> AnyValue {
        match self {
            MessageParams::Array(items) => AnyValue::Array(items),
            MessageParams::Object(object) => AnyValue::Object(object),
        }
    }

    pub fn as_object(&self) -> Option<&indexmap::IndexMap<String, AnyValue>> {
        match self {
            MessageParams::Object(object) => Some(object),
            MessageParams::Array(_) => None,
        }
    }
}

/// The three JSON-RPC message shapes. `jsonrpc` is always the
/// literal `"2.0"` and is not represented here; the codec fills it in on
/// serialization and validates it on parse.
#[derive(Debug, Clone)]
pub enum Message {
    Request {
        id: RequestId,
        method: String,
        params: Option<MessageParams>,
    },
    Notification {
        method: String,
        params: Option<MessageParams>,
    },
    Response {
        id: ResponseId,
        result: Option<AnyValue>,
        error: Option<LspError>,
    },
}

impl Message {
    pub fn method(&self) -> Option<&str> {
        match self {
            Message::Request { method, .. } | Message::Notification { method, .. } => Some(method),
            Message::Response { .. } => None,
        }
    }
}

/// Monotonic 64-bit ordinal assigned at inbound-dequeue time; the sole
/// ordering key for the scheduler. A notification still consumes one so
/// ordinals stay dense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SendId(pub u64);

impl fmt::Display for SendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single-producer monotonic counter. Only the listener thread calls `next`.
#[derive(Debug, Default)]
pub struct SendIdGenerator {
    serial: AtomicI64,
}

impl SendIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> SendId {
        let id = self.serial.fetch_add(1, Ordering::Relaxed);
        SendId(id as u64)
    }
}
