use super::{fields, DiagnosticRecord};

/// Identity of a diagnostic across export files.
///
/// Two records are duplicates iff their keys are equal, whatever naming
/// convention the export used for the underlying fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    pub file: String,
    pub code: String,
    pub line: String,
    pub column: String,
    pub message: String,
}

fn position_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CanonicalKey {
    pub fn of(record: &DiagnosticRecord) -> Self {
        let (line, column) = fields::position(record);
        CanonicalKey {
            file: fields::file(record).unwrap_or_default(),
            code: fields::code(record).unwrap_or_default(),
            line: position_text(line),
            column: position_text(column),
            message: fields::message(record).unwrap_or_default(),
        }
    }
}
