use std::collections::HashSet;

use serde_json::Value;

use crate::diagnostics::{self, CanonicalKey, DiagnosticRecord};

/// Result of merging a batch of export files, with the counters the
/// operator sees.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Merged (and usually deduplicated) records, in first-seen order
    pub records: Vec<DiagnosticRecord>,
    /// Input files considered
    pub inputs: usize,
    /// Files decoded successfully
    pub documents_read: usize,
    /// Files skipped because they could not be read or parsed
    pub documents_failed: usize,
    /// Records extracted before deduplication
    pub records_in: usize,
}

impl MergeOutcome {
    pub fn records_out(&self) -> usize {
        self.records.len()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.records_in - self.records.len()
    }
}

/// Flatten decoded export documents into one record list, in document order
/// and then element order.
pub fn merge_documents<I>(documents: I) -> Vec<DiagnosticRecord>
where
    I: IntoIterator<Item = Value>,
{
    documents
        .into_iter()
        .flat_map(diagnostics::extract_records)
        .collect()
}

/// Drop every record whose canonical key was already seen.
///
/// First occurrence wins and the survivors keep their relative order.
pub fn deduplicate(mut records: Vec<DiagnosticRecord>) -> Vec<DiagnosticRecord> {
    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(CanonicalKey::of(record)));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages(records: &[DiagnosticRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r["message"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn bare_and_wrapped_duplicates_collapse() {
        let merged = merge_documents(vec![
            json!([{"source": "clangd", "message": "m1", "file": "a.c"}]),
            json!({"diagnostics": [{"source": "clangd", "message": "m1", "file": "a.c"}]}),
        ]);
        assert_eq!(merged.len(), 2);
        let unique = deduplicate(merged);
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn order_is_first_seen() {
        let merged = merge_documents(vec![
            json!([
                {"file": "a.c", "message": "m3"},
                {"file": "a.c", "message": "m1"}
            ]),
            json!({"problems": [
                {"file": "a.c", "message": "m2"},
                {"file": "a.c", "message": "m3"}
            ]}),
        ]);
        let unique = deduplicate(merged);
        assert_eq!(messages(&unique), vec!["m3", "m1", "m2"]);
    }

    #[test]
    fn first_occurrence_keeps_its_shape() {
        let merged = merge_documents(vec![json!([
            {"resource": "a.c", "startLineNumber": 1, "startColumn": 2, "message": "m", "severity": 4},
            {"file": "a.c", "range": {"start": {"line": 1, "character": 2}}, "message": "m"}
        ])]);
        let unique = deduplicate(merged);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0]["severity"], 4);
    }

    #[test]
    fn merging_is_idempotent() {
        let documents = vec![
            json!([
                {"file": "a.c", "message": "m1"},
                {"file": "b.c", "message": "m2"},
                {"file": "a.c", "message": "m1"}
            ]),
            json!({"items": [{"file": "c.c", "message": "m3"}]}),
        ];

        let once = deduplicate(merge_documents(documents.clone()));
        let twice = deduplicate(merge_documents(
            documents.iter().cloned().chain(documents.iter().cloned()),
        ));
        assert_eq!(once, twice);

        let replay = Value::Array(once.iter().cloned().map(Value::Object).collect());
        let again = deduplicate(merge_documents(vec![replay.clone(), replay]));
        assert_eq!(once, again);
    }
}
