use crate::diagnostics::DiagnosticRecord;
use crate::error::DiagError;

/// Render merged diagnostics as one compact JSON array.
///
/// Non-ASCII text is written as-is, not as `\u` escapes.
pub fn render(records: &[DiagnosticRecord]) -> Result<String, DiagError> {
    Ok(serde_json::to_string(records)?)
}
