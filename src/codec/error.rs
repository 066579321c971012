//! Maps a `serde_json` deserialization failure onto an `InvalidParams`
//! that names the type and the offending attribute.

use std::borrow::Cow;

use crate::error::LspError;

/// Best-effort extraction of the field name `serde`'s missing-field /
/// unknown-field / type-mismatch messages quote in backticks. Falls back to
/// `"<value>"` when the message doesn't name one (e.g. a top-level type
/// mismatch with no field at all).
fn extract_attribute(message: &str) -> Cow<'static, str> {
    if let Some(start) = message.find('`') {
        if let Some(end) = message[start + 1..].find('`') {
            return Cow::Owned(message[start + 1..start + 1 + end].to_owned());
        }
    }
    Cow::Borrowed("<value>")
}

pub fn map_deserialize_error(type_name: &'static str, error: &serde_json::Error) -> LspError {
    let message = error.to_string();
    let attribute = extract_attribute(&message);
    LspError::invalid_params(type_name, attribute, message)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_quoted_field_name() {
        assert_eq!(extract_attribute("missing field `position`"), "position");
    }

    #[test]
    fn falls_back_when_nothing_is_quoted() {
        assert_eq!(extract_attribute("invalid type: found string"), "<value>");
    }
}
