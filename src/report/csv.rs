//! Minimal `;`-delimited CSV support for the report tables.
//!
//! Writes quote fields only when needed (delimiter, quote or line break
//! inside) and end rows with `\r\n`. The reader accepts the same dialect with
//! either line ending.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::DiagError;

pub const DELIMITER: char = ';';
const QUOTE: char = '"';

/// Characters that make office tools treat a cell as a formula.
const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Neutralize spreadsheet formula injection by prefixing `'`.
pub fn sanitize_cell(text: &str) -> Cow<'_, str> {
    if text.starts_with(&FORMULA_TRIGGERS[..]) {
        Cow::Owned(format!("'{text}"))
    } else {
        Cow::Borrowed(text)
    }
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(&[DELIMITER, QUOTE, '\r', '\n'][..]) {
        Cow::Owned(format!("\"{}\"", field.replace(QUOTE, "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Render one CSV record, including the trailing line terminator.
pub fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut line = cells
        .iter()
        .map(|cell| escape_field(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string());
    line.push_str("\r\n");
    line
}

/// Write a header row followed by data rows to `path`.
pub fn write_table<H, R>(path: &Path, header: &[H], rows: R) -> Result<(), DiagError>
where
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<String>>,
{
    let file = File::create(path).map_err(|e| DiagError::io(path, e))?;
    let mut out = BufWriter::new(file);
    out.write_all(format_row(header).as_bytes())
        .map_err(|e| DiagError::io(path, e))?;
    for row in rows {
        out.write_all(format_row(row.as_slice()).as_bytes())
            .map_err(|e| DiagError::io(path, e))?;
    }
    out.flush().map_err(|e| DiagError::io(path, e))
}

/// Split CSV text into records of fields.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            QUOTE if field.is_empty() => in_quotes = true,
            DELIMITER => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            // Blank lines carry no record.
            '\n' | '\r' if record.is_empty() && field.is_empty() => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}
