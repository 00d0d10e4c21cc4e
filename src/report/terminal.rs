use std::path::Path;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use owo_colors::{OwoColorize, Stream, Style};

use crate::report::merger::MergeOutcome;
use crate::report::table::ReportTables;

/// Files listed in the report summary table.
const TOP_FILES: usize = 10;

/// `text` in `style` when stdout is a color terminal, plain otherwise.
pub fn paint(text: impl ToString, style: Style) -> String {
    let text = text.to_string();
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

/// The leading status marker, kept plain when piped.
pub fn ok_marker() -> String {
    paint("OK:", Style::new().green().bold())
}

/// Status line printed after a merge.
pub fn render_merge(outcome: &MergeOutcome, output: &Path) {
    println!(
        "{} inputs={} read_ok={} read_fail={} diagnostics_in={} diagnostics_out={} output={}",
        ok_marker(),
        outcome.inputs,
        outcome.documents_read,
        outcome.documents_failed,
        outcome.records_in,
        outcome.records_out(),
        output.display()
    );
    if outcome.duplicates_removed() > 0 {
        println!(
            "    {} duplicate diagnostics removed",
            paint(outcome.duplicates_removed(), Style::new().dimmed())
        );
    }
}

/// Counts and the most affected files after a report run.
pub fn render_report(tables: &ReportTables) {
    println!();
    println!(
        "{} {} of {} diagnostics reported across {} files",
        ok_marker(),
        paint(tables.detailed.len(), Style::new().bold()),
        tables.items_total,
        tables.per_file.len()
    );

    let collection = match (tables.collection.day.as_str(), tables.collection.version.as_str()) {
        ("", "") => None,
        (day, "") => Some(day.to_string()),
        ("", version) => Some(version.to_string()),
        (day, version) => Some(format!("{day} | {version}")),
    };
    if let Some(collection) = collection {
        println!("    collection: {}", paint(collection, Style::new().cyan()));
    }
    if tables.filtered_out > 0 {
        println!("    {} filtered out", paint(tables.filtered_out, Style::new().dimmed()));
    }
    if tables.skipped_invalid > 0 {
        println!(
            "    {} skipped (missing source/message)",
            paint(tables.skipped_invalid, Style::new().yellow())
        );
    }

    if tables.per_file.is_empty() {
        println!();
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Count"]);
    for row in tables.per_file.iter().take(TOP_FILES) {
        table.add_row(vec![
            Cell::new(&row.file),
            Cell::new(row.count).set_alignment(CellAlignment::Right),
        ]);
    }

    println!();
    println!("{table}");
    if tables.per_file.len() > TOP_FILES {
        println!(
            "    … and {} more files",
            paint(tables.per_file.len() - TOP_FILES, Style::new().dimmed())
        );
    }
    println!();
}
