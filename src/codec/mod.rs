//! AnyValue ↔ typed-LSP-struct translation.
//!
//! [`decode_envelope`]/[`encode_envelope`] sit at the outer edge, translating
//! a raw JSON document to and from a [`Message`]. Inside that,
//! [`any_to`]/[`params_to`] project a message's `AnyValue` params into a
//! typed shape, and [`to_any`]/[`to_object`] serialize one back. The
//! concrete ~200 LSP shapes themselves
//! (`InitializeParams`, `CompletionItem`, `Diagnostic`, ...) come from the
//! `lsp-types` crate rather than being hand-authored here — see
//! `DESIGN.md` for the rationale.
//! `serde_json::Value` is the wire intermediate both directions go
//! through; nothing here aliases an input sub-tree into an owned output
//! because `serde`'s `Deserialize` and `Serialize` always produce fresh
//! owned values. Before a value reaches `lsp_types`' `Deserialize` impls,
//! [`any_to`]/[`params_to`] run it through [`numeric`]'s whole-decimal
//! coercion and known-enum validation; see that module for why both exist
//! as a separate pass rather than relying on `serde` alone.

mod error;
mod numeric;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as Json;

use crate::any_value::{AnyValue, Tag};
use crate::error::ext::ResultExt;
use crate::error::LspError;
use crate::message::{Message, MessageParams, RequestId, ResponseId};

/// Validates and projects an `AnyValue` into a typed LSP shape `T`.
///
/// `type_name` is used to build `InvalidParams` messages
/// ("InitializeParams.processId: ...") and to look up `T`'s closed-enum
/// fields in [`numeric::validate_known_enums`]; it does not otherwise
/// affect how `T` is deserialized.
pub fn any_to<T: DeserializeOwned>(type_name: &'static str, value: &AnyValue) -> Result<T, LspError> {
    let mut value = value.deep_clone();
    numeric::coerce_whole_decimals(&mut value);
    let json = value.to_json();
    numeric::validate_known_enums(type_name, &json)?;
    serde_json::from_value(json).map_err(|e| error::map_deserialize_error(type_name, &e))
}

/// Same as [`any_to`] but for a request/notification's top-level `params`,
/// which may be entirely absent on the wire. Absence is treated as an
/// empty object so that `T`'s own required fields (if any) produce the
/// usual missing-field `InvalidParams`, and so that param-less methods
/// (`T = ()`) deserialize successfully.
pub fn params_to<T: DeserializeOwned>(
    type_name: &'static str,
    params: Option<&MessageParams>,
) -> Result<T, LspError> {
    let mut value = match params {
        Some(MessageParams::Object(object)) => AnyValue::Object(object.clone()),
        Some(MessageParams::Array(items)) => AnyValue::Array(items.clone()),
        None => AnyValue::Object(indexmap::IndexMap::new()),
    };
    numeric::coerce_whole_decimals(&mut value);
    let json = value.to_json();
    numeric::validate_known_enums(type_name, &json)?;
    serde_json::from_value(json).map_err(|e| error::map_deserialize_error(type_name, &e))
}

/// Serializes a typed value back to an `AnyValue`.
pub fn to_any<T: Serialize>(value: &T) -> Result<AnyValue, LspError> {
    let json = serde_json::to_value(value).internal_error("serializing response")?;
    Ok(AnyValue::from_json(json))
}

/// Like [`to_any`] but requires (and asserts, via an internal error rather
/// than a panic, if violated) that the result is an object — used for
/// building LSP request/notification `params`, which are always objects on
/// the wire.
pub fn to_object(value: &impl Serialize) -> Result<indexmap::IndexMap<String, AnyValue>, LspError> {
    match to_any(value)? {
        AnyValue::Object(object) => Ok(object),
        other => Err(LspError::InternalError(format!(
            "expected serialization to produce an object, got {}",
            other.tag()
        ))),
    }
}

/// Parses a raw wire payload (one already-unframed JSON document, see
/// [`crate::framing`]) into a [`Message`]; malformed JSON is a `ParseError`,
/// anything that isn't a request, notification, or response shape is an
/// `InvalidRequest`.
pub fn decode_envelope(raw: &str) -> Result<Message, LspError> {
    let json: Json = serde_json::from_str(raw).map_err(|e| LspError::ParseError(e.to_string()))?;
    let value = AnyValue::from_json(json);
    let object = value
        .as_object()
        .ok_or_else(|| LspError::InvalidRequest("message must be a JSON object".into()))?;

    if let Some(version) = object.get("jsonrpc") {
        if version.as_str() != Some("2.0") {
            return Err(LspError::InvalidRequest(format!(
                "unsupported jsonrpc version {version:?}, expected \"2.0\""
            )));
        }
    }

    let params = object
        .get("params")
        .map(|p| MessageParams::from_any(p.deep_clone()))
        .transpose()?;

    let method = object.get("method").and_then(AnyValue::as_str).map(str::to_owned);
    let has_id = object.contains_key("id");

    match (method, has_id) {
        (Some(method), true) => {
            let id = decode_request_id(object.get("id").unwrap())?;
            Ok(Message::Request { id, method, params })
        }
        (Some(method), false) => Ok(Message::Notification { method, params }),
        (None, true) => {
            let id = decode_response_id(object.get("id").unwrap())?;
            let result = object.get("result").map(AnyValue::deep_clone);
            let error = object.get("error").map(decode_error_object).transpose()?;
            Ok(Message::Response { id, result, error })
        }
        (None, false) => Err(LspError::InvalidRequest(
            "message has neither `method` nor a response `id`/`result`/`error`".into(),
        )),
    }
}

fn decode_request_id(id: &AnyValue) -> Result<RequestId, LspError> {
    match id {
        AnyValue::String(s) => Ok(RequestId::String(s.clone())),
        AnyValue::Int32(i) => Ok(RequestId::Int(i64::from(*i))),
        AnyValue::UInt32(u) => Ok(RequestId::Int(i64::from(*u))),
        AnyValue::Float64(f) if f.fract() == 0.0 => Ok(RequestId::Int(*f as i64)),
        other => Err(LspError::InvalidRequest(format!(
            "request id must be an integer or string, found {}",
            other.tag()
        ))),
    }
}

fn decode_response_id(id: &AnyValue) -> Result<ResponseId, LspError> {
    match id {
        AnyValue::Null => Ok(ResponseId::Null),
        other => decode_request_id(other).map(ResponseId::from),
    }
}

fn decode_error_object(value: &AnyValue) -> Result<LspError, LspError> {
    let object = value
        .as_object()
        .ok_or_else(|| LspError::InvalidRequest("error must be an object".into()))?;
    let code = match object.get("code") {
        Some(AnyValue::Int32(i)) => i64::from(*i),
        Some(AnyValue::UInt32(u)) => i64::from(*u),
        _ => return Err(LspError::InvalidRequest("error.code must be an integer".into())),
    };
    let message = object
        .get("message")
        .and_then(AnyValue::as_str)
        .ok_or_else(|| LspError::InvalidRequest("error.message must be a string".into()))?
        .to_owned();
    let data = object.get("data").map(AnyValue::to_json);
    Ok(LspError::HandlerRejection { code, message, data })
}

/// Builds the `{"jsonrpc": "2.0", ...}` wire payload for a [`Message`].
pub fn encode_envelope(message: &Message) -> Result<String, LspError> {
    let value = match message {
        Message::Request { id, method, params } => envelope(vec![
            ("id", encode_request_id(id)),
            ("method", AnyValue::String(method.clone())),
            ("params", params.clone().map(MessageParams::into_any).unwrap_or(AnyValue::Null)),
        ]),
        Message::Notification { method, params } => envelope(vec![
            ("method", AnyValue::String(method.clone())),
            ("params", params.clone().map(MessageParams::into_any).unwrap_or(AnyValue::Null)),
        ]),
        Message::Response { id, result, error } => {
            let mut fields = vec![("id", encode_response_id(id))];
            match error {
                Some(error) => fields.push(("error", encode_error(error))),
                None => fields.push(("result", result.clone().unwrap_or(AnyValue::Null))),
            }
            envelope(fields)
        }
    };
    serde_json::to_string(&value.to_json()).internal_error("encoding envelope")
}

fn envelope(fields: Vec<(&'static str, AnyValue)>) -> AnyValue {
    let mut object = indexmap::IndexMap::with_capacity(fields.len() + 1);
    object.insert("jsonrpc".to_owned(), AnyValue::String("2.0".to_owned()));
    for (key, value) in fields {
        if !matches!(value, AnyValue::Null) || key == "result" {
            object.insert(key.to_owned(), value);
        }
    }
    AnyValue::Object(object)
}

fn encode_request_id(id: &RequestId) -> AnyValue {
    match id {
        RequestId::Int(i) => i32::try_from(*i).map(AnyValue::Int32).unwrap_or(AnyValue::Float64(*i as f64)),
        RequestId::String(s) => AnyValue::String(s.clone()),
    }
}

fn encode_response_id(id: &ResponseId) -> AnyValue {
    match id {
        ResponseId::Int(i) => i32::try_from(*i).map(AnyValue::Int32).unwrap_or(AnyValue::Float64(*i as f64)),
        ResponseId::String(s) => AnyValue::String(s.clone()),
        ResponseId::Null => AnyValue::Null,
    }
}

fn encode_error(error: &LspError) -> AnyValue {
    let (code, message, data) = error.to_payload();
    let mut object = indexmap::IndexMap::new();
    let code = i32::try_from(code).map(AnyValue::Int32).unwrap_or(AnyValue::Float64(code as f64));
    object.insert("code".to_owned(), code);
    object.insert("message".to_owned(), AnyValue::String(message));
    if let Some(data) = data {
        object.insert("data".to_owned(), AnyValue::from_json(data));
    }
    AnyValue::Object(object)
}

/// Integers pass through, a decimal is accepted only when it has no
/// fractional part, anything else (including an out-of-range decimal) is
/// `InvalidParams`. Used by [`numeric::coerce_whole_decimals`] to normalize
/// every numeric leaf in an incoming `AnyValue` before it reaches
/// `any_to`/`params_to`'s typed deserialization, and available directly to
/// a `Handler` reading an individual field out of a free-form `AnyValue`.
pub fn any_to_int(value: &AnyValue) -> Result<i32, LspError> {
    match value {
        AnyValue::Int32(i) => Ok(*i),
        AnyValue::UInt32(u) => i32::try_from(*u)
            .map_err(|_| LspError::invalid_params("integer", "<value>", format!("{u} is out of i32 range"))),
        AnyValue::Float64(f) => {
            if f.fract() != 0.0 {
                return Err(LspError::invalid_params(
                    "integer",
                    "<value>",
                    format!("{f} has a fractional part, an integer was expected"),
                ));
            }
            if *f < f64::from(i32::MIN) || *f > f64::from(i32::MAX) {
                return Err(LspError::invalid_params(
                    "integer",
                    "<value>",
                    format!("{f} is out of i32 range"),
                ));
            }
            Ok(*f as i32)
        }
        other => Err(LspError::wrong_tag("integer", "<value>", Tag::Int32, other.tag())),
    }
}

/// A negative integer or fractional decimal is rejected, everything else
/// that's non-negative and whole is accepted. See [`any_to_int`] for where
/// this is used in the real decode path.
pub fn any_to_unsigned_int(value: &AnyValue) -> Result<u32, LspError> {
    match value {
        AnyValue::UInt32(u) => Ok(*u),
        AnyValue::Int32(i) => u32::try_from(*i)
            .map_err(|_| LspError::invalid_params("uinteger", "<value>", format!("{i} is negative"))),
        AnyValue::Float64(f) => {
            if *f < 0.0 {
                return Err(LspError::invalid_params("uinteger", "<value>", format!("{f} is negative")));
            }
            if f.fract() != 0.0 {
                return Err(LspError::invalid_params(
                    "uinteger",
                    "<value>",
                    format!("{f} has a fractional part, a uinteger was expected"),
                ));
            }
            if *f > f64::from(u32::MAX) {
                return Err(LspError::invalid_params(
                    "uinteger",
                    "<value>",
                    format!("{f} is out of u32 range"),
                ));
            }
            Ok(*f as u32)
        }
        other => Err(LspError::wrong_tag("uinteger", "<value>", Tag::UInt32, other.tag())),
    }
}

/// Structural discrimination of `TextDocumentContentChangeEvent`:
/// `range` present means a partial edit, absent means the whole document
/// was replaced. `lsp-types`
/// models this union as one struct with an `Option<Range>` rather than a
/// Rust enum, so this is the discrimination rule made explicit for
/// call sites that need to branch on it.
#[derive(Debug, Clone)]
pub enum TextChangeEvent {
    Partial {
        range: lsp_types::Range,
        range_length: Option<u32>,
        text: String,
    },
    Whole {
        text: String,
    },
}

pub fn classify_text_document_content_change(
    event: &lsp_types::TextDocumentContentChangeEvent,
) -> TextChangeEvent {
    match event.range {
        Some(range) => TextChangeEvent::Partial {
            range,
            range_length: event.range_length,
            text: event.text.clone(),
        },
        None => TextChangeEvent::Whole {
            text: event.text.clone(),
        },
    }
}
