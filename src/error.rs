//! Error kinds recognized by the core.
//!
//! These are kinds, not exceptions: every one of them terminates as a
//! JSON-RPC error response, never a panic. The one exception is a transport
//! failure, which the dispatcher treats as session termination rather than
//! a response.

use std::borrow::Cow;

use serde_json::Value as Json;
use thiserror::Error;

use crate::any_value::Tag;

/// JSON-RPC / LSP error codes (`ErrorCodes`/`LSPErrorCodes`).
pub mod code {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const SERVER_NOT_INITIALIZED: i64 = -32002;
    pub const UNKNOWN_ERROR_CODE: i64 = -32001;
    pub const REQUEST_FAILED: i64 = -32803;
    pub const SERVER_CANCELLED: i64 = -32802;
    pub const CONTENT_MODIFIED: i64 = -32801;
    pub const REQUEST_CANCELLED: i64 = -32800;
}

/// An `LspError` is always surfaced as `{code, message, data?}` on the
/// outbound response; see [`LspError::to_payload`].
#[derive(Debug, Error, Clone)]
pub enum LspError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("invalid params for {type_name}.{attribute}: {reason}")]
    InvalidParams {
        type_name: Cow<'static, str>,
        attribute: Cow<'static, str>,
        reason: String,
    },

    #[error("internal error: {0}")]
    InternalError(String),

    #[error("server not initialized")]
    ServerNotInitialized,

    #[error("handler rejected request: {message}")]
    HandlerRejection {
        code: i64,
        message: String,
        data: Option<Json>,
    },
}

impl LspError {
    pub fn invalid_params(
        type_name: impl Into<Cow<'static, str>>,
        attribute: impl Into<Cow<'static, str>>,
        reason: impl Into<String>,
    ) -> Self {
        LspError::InvalidParams {
            type_name: type_name.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_field(type_name: impl Into<Cow<'static, str>>, attribute: impl Into<Cow<'static, str>>) -> Self {
        Self::invalid_params(type_name, attribute, "required field is absent")
    }

    pub fn wrong_tag(
        type_name: impl Into<Cow<'static, str>>,
        attribute: impl Into<Cow<'static, str>>,
        expected: Tag,
        received: Tag,
    ) -> Self {
        Self::invalid_params(
            type_name,
            attribute,
            format!("expected {expected}, received {received}"),
        )
    }

    pub fn unknown_enum_value(
        type_name: impl Into<Cow<'static, str>>,
        attribute: impl Into<Cow<'static, str>>,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::invalid_params(type_name, attribute, format!("unrecognized enum value `{value}`"))
    }

    /// The `(code, message, data)` triple that goes on the wire.
    pub fn to_payload(&self) -> (i64, String, Option<Json>) {
        match self {
            LspError::ParseError(message) => (code::PARSE_ERROR, message.clone(), None),
            LspError::InvalidRequest(message) => (code::INVALID_REQUEST, message.clone(), None),
            LspError::MethodNotFound(method) => {
                (code::METHOD_NOT_FOUND, format!("method not found: {method}"), None)
            }
            LspError::InvalidParams { .. } => (code::INVALID_PARAMS, self.to_string(), None),
            LspError::InternalError(message) => (code::INTERNAL_ERROR, message.clone(), None),
            LspError::ServerNotInitialized => (
                code::SERVER_NOT_INITIALIZED,
                "server has not received the initialize request yet".to_owned(),
                None,
            ),
            LspError::HandlerRejection { code, message, data } => (*code, message.clone(), data.clone()),
        }
    }
}

/// `Result` alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, LspError>;

/// A small extension trait for attaching an `LspError` to a foreign
/// `Result` anywhere outside the codec.
pub mod ext {
    use std::borrow::Cow;
    use std::fmt::Display;

    use super::LspError;

    pub trait ResultExt<T> {
        /// Wraps a foreign error as `InternalError`, prefixed with `context`.
        fn internal_error(self, context: impl Display) -> Result<T, LspError>;

        /// Wraps a foreign error as `InvalidParams`, attributing it to
        /// `type_name.attribute`.
        fn invalid_params(
            self,
            type_name: impl Into<Cow<'static, str>>,
            attribute: impl Into<Cow<'static, str>>,
        ) -> Result<T, LspError>;
    }

    impl<T, E: Display> ResultExt<T> for std::result::Result<T, E> {
        fn internal_error(self, context: impl Display) -> Result<T, LspError> {
            self.map_err(|e| LspError::InternalError(format!("{context}: {e}")))
        }

        fn invalid_params(
            self,
            type_name: impl Into<Cow<'static, str>>,
            attribute: impl Into<Cow<'static, str>>,
        ) -> Result<T, LspError> {
            self.map_err(|e| LspError::invalid_params(type_name, attribute, e.to_string()))
        }
    }
}
