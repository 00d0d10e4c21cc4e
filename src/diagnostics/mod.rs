pub mod fields;
pub mod key;

use serde_json::{Map, Value};

pub use key::CanonicalKey;

/// One diagnostic exactly as it appeared in an export document.
pub type DiagnosticRecord = Map<String, Value>;

/// Wrapper keys that may hold the diagnostic list, in lookup order.
pub const WRAPPER_KEYS: [&str; 4] = ["problems", "diagnostics", "items", "data"];

/// Pull the diagnostic objects out of a decoded export document.
///
/// Accepts a bare array or an object carrying an array under one of
/// [`WRAPPER_KEYS`]. Non-object elements are dropped; any other document
/// shape yields nothing.
pub fn extract_records(document: Value) -> Vec<DiagnosticRecord> {
    let list = match document {
        Value::Array(list) => list,
        Value::Object(mut wrapper) => {
            let key = WRAPPER_KEYS
                .iter()
                .find(|key| matches!(wrapper.get(**key), Some(Value::Array(_))));
            match key.and_then(|key| wrapper.remove(*key)) {
                Some(Value::Array(list)) => list,
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    list.into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}
