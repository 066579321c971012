//! `AnyValue`: the tagged dynamic value tree that sits between the wire and
//! the typed LSP shapes.
//!
//! This is deliberately not `serde_json::Value`: the LSP wire format
//! distinguishes `integer` from `uinteger` from `decimal`, and the codec's
//! numeric coercion rules need that distinction to reject, say, a
//! negative number where a `uinteger` was expected. `serde_json::Value` is
//! still used as the literal wire format produced by [`Framing`](crate::framing);
//! [`AnyValue::from_json`] and [`AnyValue::to_json`] are the only bridge.

use indexmap::IndexMap;
use serde_json::{Number, Value as Json};

/// A tagged dynamic value, isomorphic to a JSON value but distinguishing the
/// three LSP numeric kinds.
///
/// An `AnyValue` exclusively owns its children. [`AnyValue::deep_clone`] is
/// the explicit deep-copy entry point the codec uses wherever a free-form
/// value (`data`, `experimental`, `metadata`) is retained past the call that
/// produced it; ordinary [`Clone::clone`] is equally deep (there is no
/// sharing to preserve) but `deep_clone` names the invariant at the call
/// site instead of leaving it implicit.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    Null,
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Float64(f64),
    String(String),
    Array(Vec<AnyValue>),
    /// Insertion-ordered; a duplicate key on the wire is not a protocol
    /// error, last write wins.
    Object(IndexMap<String, AnyValue>),
}

/// Name used in `InvalidParams` messages ("expected object, received
/// string").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Null,
    Bool,
    Int32,
    UInt32,
    Float64,
    String,
    Array,
    Object,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tag::Null => "null",
            Tag::Bool => "boolean",
            Tag::Int32 => "integer",
            Tag::UInt32 => "uinteger",
            Tag::Float64 => "decimal",
            Tag::String => "string",
            Tag::Array => "array",
            Tag::Object => "object",
        };
        f.write_str(name)
    }
}

impl AnyValue {
    pub fn tag(&self) -> Tag {
        match self {
            AnyValue::Null => Tag::Null,
            AnyValue::Bool(_) => Tag::Bool,
            AnyValue::Int32(_) => Tag::Int32,
            AnyValue::UInt32(_) => Tag::UInt32,
            AnyValue::Float64(_) => Tag::Float64,
            AnyValue::String(_) => Tag::String,
            AnyValue::Array(_) => Tag::Array,
            AnyValue::Object(_) => Tag::Object,
        }
    }

    /// Explicit deep copy. See the type-level docs for why this exists
    /// alongside `Clone`.
    pub fn deep_clone(&self) -> AnyValue {
        self.clone()
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, AnyValue>> {
        match self {
            AnyValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AnyValue]> {
        match self {
            AnyValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AnyValue::Null)
    }

    /// Construct from a parsed wire payload. Duplicate object keys collapse
    /// to the last value seen.
    pub fn from_json(value: Json) -> AnyValue {
        match value {
            Json::Null => AnyValue::Null,
            Json::Bool(b) => AnyValue::Bool(b),
            Json::Number(n) => AnyValue::from_json_number(&n),
            Json::String(s) => AnyValue::String(s),
            Json::Array(items) => AnyValue::Array(items.into_iter().map(AnyValue::from_json).collect()),
            Json::Object(map) => {
                let mut object = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key, AnyValue::from_json(value));
                }
                AnyValue::Object(object)
            }
        }
    }

    fn from_json_number(n: &Number) -> AnyValue {
        if let Some(u) = n.as_u64() {
            if let Ok(u) = u32::try_from(u) {
                return AnyValue::UInt32(u);
            }
        }
        if let Some(i) = n.as_i64() {
            if let Ok(i) = i32::try_from(i) {
                return AnyValue::Int32(i);
            }
        }
        AnyValue::Float64(n.as_f64().unwrap_or_default())
    }

    /// Serialize back to a plain JSON value for framing.
    pub fn to_json(&self) -> Json {
        match self {
            AnyValue::Null => Json::Null,
            AnyValue::Bool(b) => Json::Bool(*b),
            AnyValue::Int32(i) => Json::Number((*i).into()),
            AnyValue::UInt32(u) => Json::Number((*u).into()),
            AnyValue::Float64(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            AnyValue::String(s) => Json::String(s.clone()),
            AnyValue::Array(items) => Json::Array(items.iter().map(AnyValue::to_json).collect()),
            AnyValue::Object(map) => {
                Json::Object(map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }
}

impl From<bool> for AnyValue {
    fn from(value: bool) -> Self {
        AnyValue::Bool(value)
    }
}

impl From<String> for AnyValue {
    fn from(value: String) -> Self {
        AnyValue::String(value)
    }
}

impl From<&str> for AnyValue {
    fn from(value: &str) -> Self {
        AnyValue::String(value.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_object_keys_last_write_wins() {
        let value = AnyValue::from_json(json!({"a": 1, "b": 2}));
        // serde_json's Value itself collapses duplicate keys during parsing
        // (last wins), so this asserts AnyValue preserves that behavior
        // rather than introducing its own.
        let object = value.as_object().unwrap();
        assert_eq!(object.get("a"), Some(&AnyValue::UInt32(1)));
        assert_eq!(object.get("b"), Some(&AnyValue::UInt32(2)));
    }

    #[test]
    fn numeric_tagging() {
        assert_eq!(AnyValue::from_json(json!(5)), AnyValue::UInt32(5));
        assert_eq!(AnyValue::from_json(json!(-5)), AnyValue::Int32(-5));
        assert_eq!(AnyValue::from_json(json!(5.5)), AnyValue::Float64(5.5));
    }

    #[test]
    fn round_trip_object_order() {
        let value = AnyValue::from_json(json!({"z": 1, "a": 2, "m": 3}));
        let back = value.to_json();
        let keys: Vec<_> = back.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn deep_clone_is_independent() {
        let mut original = AnyValue::Array(vec![AnyValue::String("a".into())]);
        let clone = original.deep_clone();
        if let AnyValue::Array(items) = &mut original {
            items.push(AnyValue::String("b".into()));
        }
        assert_eq!(clone, AnyValue::Array(vec![AnyValue::String("a".into())]));
    }
}
