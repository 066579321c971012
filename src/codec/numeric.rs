//! Two passes applied to an incoming `AnyValue` tree before it reaches
//! `lsp_types`' derived `Deserialize` impls: coercing whole-number decimals
//! to integers, and checking known enum-bearing fields against the closed
//! tables in [`crate::schema::enums`].
//!
//! `lsp_types`' generated structs deserialize `u32`/`i32` fields through
//! serde's primitive `Deserialize` impls, which reject a JSON number that
//! arrived as a decimal (`3.0`) even though it carries no fractional part.
//! [`coerce_whole_decimals`] walks the tree and replaces every such leaf,
//! via [`super::any_to_int`]/[`super::any_to_unsigned_int`], with the
//! integer a client that wrote `3` instead of `3.0` would have produced.
//! A float outside both ranges (astronomically large, which nothing in
//! LSP's numeric fields is) is left alone and falls through to the usual
//! type-mismatch error.
//!
//! Those same structs model enums as open newtypes (any `i32`/`String`
//! round-trips), so out-of-range values pass through silently.
//! [`validate_known_enums`] checks the fields this crate knows carry a
//! closed enum against `schema::enums`'s tables, keyed off the same
//! `type_name` callers already pass to `any_to`/`params_to`. It is a
//! finite, hand-maintained table rather than a generic walk of every LSP
//! shape: `lsp_types`' structs carry no metadata tying a field back to one
//! of this crate's enum tables, and several wire field names (`kind`,
//! `tags`) are reused across shapes with different valid ranges, so a
//! name-only walk would mis-validate. Shapes not listed here still get the
//! open-newtype behavior `lsp_types` already provides.

use serde_json::Value as Json;

use super::{any_to_int, any_to_unsigned_int};
use crate::any_value::AnyValue;
use crate::error::LspError;
use crate::schema;

pub fn coerce_whole_decimals(value: &mut AnyValue) {
    match value {
        AnyValue::Float64(f) if f.fract() == 0.0 => {
            if let Ok(i) = any_to_int(&AnyValue::Float64(*f)) {
                *value = AnyValue::Int32(i);
            } else if let Ok(u) = any_to_unsigned_int(&AnyValue::Float64(*f)) {
                *value = AnyValue::UInt32(u);
            }
        }
        AnyValue::Array(items) => items.iter_mut().for_each(coerce_whole_decimals),
        AnyValue::Object(fields) => fields.values_mut().for_each(coerce_whole_decimals),
        _ => {}
    }
}

fn check_int_field<T>(
    json: &Json,
    field: &str,
    by_value: impl Fn(i32) -> Result<T, LspError>,
) -> Result<(), LspError> {
    if let Some(value) = json.get(field).and_then(Json::as_i64) {
        by_value(value as i32)?;
    }
    Ok(())
}

fn check_int_array_field<T>(
    json: &Json,
    field: &str,
    by_value: impl Fn(i32) -> Result<T, LspError>,
) -> Result<(), LspError> {
    if let Some(items) = json.get(field).and_then(Json::as_array) {
        for item in items {
            if let Some(value) = item.as_i64() {
                by_value(value as i32)?;
            }
        }
    }
    Ok(())
}

fn check_str_field<T>(
    json: &Json,
    field: &str,
    by_value: impl Fn(&str) -> Result<T, LspError>,
) -> Result<(), LspError> {
    if let Some(value) = json.get(field).and_then(Json::as_str) {
        by_value(value)?;
    }
    Ok(())
}

pub fn validate_known_enums(type_name: &str, json: &Json) -> Result<(), LspError> {
    match type_name {
        "Diagnostic" => {
            check_int_field(json, "severity", schema::DiagnosticSeverity::by_value)?;
            check_int_array_field(json, "tags", schema::DiagnosticTag::by_value)?;
        }
        "CompletionItem" => {
            check_int_field(json, "kind", schema::CompletionItemKind::by_value)?;
            check_int_array_field(json, "tags", schema::CompletionItemTag::by_value)?;
            check_int_field(json, "insertTextFormat", schema::InsertTextFormat::by_value)?;
            check_int_field(json, "insertTextMode", schema::InsertTextMode::by_value)?;
        }
        "CompletionList" => {
            if let Some(items) = json.get("items").and_then(Json::as_array) {
                for item in items {
                    validate_known_enums("CompletionItem", item)?;
                }
            }
        }
        "SymbolInformation" | "WorkspaceSymbol" => {
            check_int_field(json, "kind", schema::SymbolKind::by_value)?;
            check_int_array_field(json, "tags", schema::SymbolTag::by_value)?;
        }
        "DocumentSymbol" => {
            check_int_field(json, "kind", schema::SymbolKind::by_value)?;
            check_int_array_field(json, "tags", schema::SymbolTag::by_value)?;
            if let Some(children) = json.get("children").and_then(Json::as_array) {
                for child in children {
                    validate_known_enums("DocumentSymbol", child)?;
                }
            }
        }
        "DocumentHighlight" => {
            check_int_field(json, "kind", schema::DocumentHighlightKind::by_value)?;
        }
        "FoldingRange" => {
            check_str_field(json, "kind", schema::FoldingRangeKind::by_value)?;
        }
        "CodeAction" => {
            check_str_field(json, "kind", schema::CodeActionKind::by_value)?;
        }
        "Moniker" => {
            check_str_field(json, "kind", schema::MonikerKind::by_value)?;
            check_str_field(json, "unique", schema::UniquenessLevel::by_value)?;
        }
        "PublishDiagnosticsParams" => {
            if let Some(diagnostics) = json.get("diagnostics").and_then(Json::as_array) {
                for diagnostic in diagnostics {
                    validate_known_enums("Diagnostic", diagnostic)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}
