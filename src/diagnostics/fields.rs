//! Field lookups over loosely structured diagnostic records.
//!
//! Export variants disagree on field names and nesting, so every lookup is an
//! ordered list of fallbacks. All of them are pure and never fail: a missing
//! or oddly typed value simply comes back as `None`.

use serde_json::{Map, Value};

use super::DiagnosticRecord;

const FILE_KEYS: [&str; 4] = ["resource", "file", "uri", "path"];
const NESTED_FILE_KEYS: [&str; 3] = ["path", "fsPath", "uri"];

/// A value counts as present when it is neither null nor "empty"
/// (empty string, empty container, `false`, zero).
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_present(value))
}

/// Render a scalar as text. Strings are taken verbatim; containers are
/// rendered as compact JSON so they still produce a stable identity.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// File the diagnostic points at.
pub fn file(record: &DiagnosticRecord) -> Option<String> {
    let value = first_present(record, &FILE_KEYS)?;
    let value = match value {
        Value::Object(nested) => first_present(nested, &NESTED_FILE_KEYS)?,
        other => other,
    };
    value_text(value)
}

/// Tool-assigned code, either a plain string or `{"value": ...}`.
pub fn code(record: &DiagnosticRecord) -> Option<String> {
    match record.get("code")? {
        Value::Object(code) => code
            .get("value")
            .filter(|value| is_present(value))
            .and_then(value_text),
        Value::String(code) => Some(code.clone()),
        _ => None,
    }
}

pub fn message(record: &DiagnosticRecord) -> Option<String> {
    record.get("message").and_then(value_text)
}

/// Coerce a position value to an integer, if it plausibly is one.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Raw `(line, column)` values before integer coercion.
fn raw_position(record: &DiagnosticRecord) -> (Option<&Value>, Option<&Value>) {
    let line = record.get("startLineNumber").filter(|v| !v.is_null());
    let column = record.get("startColumn").filter(|v| !v.is_null());
    if line.is_some() && column.is_some() {
        return (line, column);
    }

    let start = record
        .get("range")
        .and_then(Value::as_object)
        .and_then(|range| range.get("start"))
        .and_then(Value::as_object);
    match start {
        Some(start) => (start.get("line"), start.get("character")),
        None => (None, None),
    }
}

/// Start position of the diagnostic.
///
/// `startLineNumber`/`startColumn` win when both are set; otherwise
/// `range.start.line`/`range.start.character` are used.
pub fn position(record: &DiagnosticRecord) -> (Option<i64>, Option<i64>) {
    let (line, column) = raw_position(record);
    (line.and_then(coerce_int), column.and_then(coerce_int))
}

/// Only string-typed `source` and `message` make a record reportable.
pub fn is_reportable(record: &DiagnosticRecord) -> bool {
    matches!(record.get("source"), Some(Value::String(_)))
        && matches!(record.get("message"), Some(Value::String(_)))
}
