use super::csv::sanitize_cell;

pub const PER_FILE_HEADER: [&str; 4] = ["day", "version", "file", "count"];
pub const DETAILED_HEADER: [&str; 8] = [
    "day", "version", "file", "line", "column", "code", "source", "message",
];

/// The capture a report belongs to. Supplied by the caller, never derived
/// from the records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub day: String,
    pub version: String,
}

/// One line of the per-file occurrence table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerFileRow {
    pub file: String,
    pub count: usize,
}

/// One line of the detailed table, before cell sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedRow {
    pub file: String,
    pub line: Option<i64>,
    pub column: Option<i64>,
    pub code: String,
    pub source: String,
    pub message: String,
}

fn text_cell(text: &str) -> String {
    sanitize_cell(text).into_owned()
}

fn position_cell(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl PerFileRow {
    /// CSV cells; text is sanitized, the count is not.
    pub fn cells(&self, collection: &Collection) -> Vec<String> {
        vec![
            text_cell(&collection.day),
            text_cell(&collection.version),
            text_cell(&self.file),
            self.count.to_string(),
        ]
    }
}

impl DetailedRow {
    /// CSV cells; text is sanitized, positions are not.
    pub fn cells(&self, collection: &Collection) -> Vec<String> {
        vec![
            text_cell(&collection.day),
            text_cell(&collection.version),
            text_cell(&self.file),
            position_cell(self.line),
            position_cell(self.column),
            text_cell(&self.code),
            text_cell(&self.source),
            text_cell(&self.message),
        ]
    }
}

/// Everything the report step produces for one input.
#[derive(Debug, Clone, Default)]
pub struct ReportTables {
    pub collection: Collection,

    /// Files ranked by occurrence count, most frequent first
    pub per_file: Vec<PerFileRow>,

    /// One row per reported diagnostic, in input order
    pub detailed: Vec<DetailedRow>,

    /// Records extracted from the input
    pub items_total: usize,

    /// Records rejected for lacking a string `source` or `message`
    pub skipped_invalid: usize,

    /// Valid records removed by the filters or the item cap
    pub filtered_out: usize,
}

impl ReportTables {
    pub fn per_file_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.per_file.iter().map(|row| row.cells(&self.collection))
    }

    pub fn detailed_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.detailed.iter().map(|row| row.cells(&self.collection))
    }
}
