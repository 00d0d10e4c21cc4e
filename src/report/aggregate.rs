use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{fields, DiagnosticRecord};
use crate::error::DiagError;
use crate::report::table::{Collection, DetailedRow, PerFileRow, ReportTables};

/// Sentinel that disables the source filter.
pub const ANY_SOURCE: &str = "*";

/// Record filters, combined with logical AND. `None` disables a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    pub source: Option<String>,
    pub code: Option<String>,
    pub message_contains: Option<String>,
    /// Keep only the first N filtered records (0 = unlimited)
    pub max_items: usize,
}

impl ReportFilters {
    /// Build filters from raw option values.
    ///
    /// `*` disables the source filter and empty strings disable the others.
    /// A negative cap is rejected rather than clamped.
    pub fn from_options(
        source: &str,
        code: &str,
        message_contains: &str,
        max_items: i64,
    ) -> Result<Self, DiagError> {
        let max_items = usize::try_from(max_items).map_err(|_| {
            DiagError::InvalidOption(format!("--max-items must be >= 0 (got {max_items})"))
        })?;
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Ok(ReportFilters {
            source: (source != ANY_SOURCE).then(|| source.to_string()),
            code: non_empty(code),
            message_contains: non_empty(message_contains),
            max_items,
        })
    }

    /// Whether a reportable record passes every enabled filter.
    pub fn keep(&self, record: &DiagnosticRecord) -> bool {
        if let Some(ref source) = self.source {
            if record.get("source").and_then(Value::as_str) != Some(source.as_str()) {
                return false;
            }
        }
        if let Some(ref code) = self.code {
            if fields::code(record).as_deref() != Some(code.as_str()) {
                return false;
            }
        }
        if let Some(ref needle) = self.message_contains {
            let message = record.get("message").and_then(Value::as_str).unwrap_or_default();
            if !message.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Count occurrences per file, most frequent first. Ties keep first-seen
/// order and records without a file are left out.
fn count_per_file<'a, I>(records: I) -> Vec<PerFileRow>
where
    I: IntoIterator<Item = &'a DiagnosticRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<PerFileRow> = Vec::new();

    for file in records.into_iter().filter_map(fields::file) {
        match index.get(&file) {
            Some(&i) => rows[i].count += 1,
            None => {
                index.insert(file.clone(), rows.len());
                rows.push(PerFileRow { file, count: 1 });
            }
        }
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

fn detailed_row(record: &DiagnosticRecord) -> DetailedRow {
    let (line, column) = fields::position(record);
    let text = |key: &str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    DetailedRow {
        file: fields::file(record).unwrap_or_default(),
        line,
        column,
        code: fields::code(record).unwrap_or_default(),
        source: text("source"),
        message: text("message"),
    }
}

/// Filter, cap and tabulate deduplicated records.
pub fn aggregate(
    records: &[DiagnosticRecord],
    filters: &ReportFilters,
    collection: Collection,
) -> ReportTables {
    let valid: Vec<&DiagnosticRecord> = records
        .iter()
        .filter(|record| fields::is_reportable(record))
        .collect();
    let skipped_invalid = records.len() - valid.len();

    let mut kept: Vec<&DiagnosticRecord> = valid
        .iter()
        .copied()
        .filter(|record| filters.keep(record))
        .collect();
    if filters.max_items > 0 {
        kept.truncate(filters.max_items);
    }
    debug!(
        "{} valid diagnostics, {} kept after filters",
        valid.len(),
        kept.len()
    );

    ReportTables {
        collection,
        per_file: count_per_file(kept.iter().copied()),
        detailed: kept.iter().map(|record| detailed_row(record)).collect(),
        items_total: records.len(),
        skipped_invalid,
        filtered_out: valid.len() - kept.len(),
    }
}
