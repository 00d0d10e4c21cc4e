//! Charts over a detailed diagnostics table.
//!
//! Reads the `;`-delimited CSV written by the report step back in, tallies
//! rows per collection, file, code and source, and renders each tally as an
//! SVG bar chart plus one Markdown summary.

pub mod markdown;
pub mod svg;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ChartsArgs;
use crate::config::DiagConfig;
use crate::error::DiagError;
use crate::report::csv;

/// Columns a detailed table must carry to be charted.
pub const REQUIRED_COLUMNS: [&str; 6] = ["day", "version", "file", "code", "source", "message"];

const EMPTY_LABEL: &str = "(empty)";
const UNKNOWN_COLLECTION: &str = "(unknown)";

/// Occurrence counts keyed by label, remembering first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    /// The `n` largest counts, most frequent first; ties keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Per-dimension counts for one detailed table.
#[derive(Debug, Clone, Default)]
pub struct ChartTallies {
    pub total: usize,
    pub collections: Tally,
    pub files: Tally,
    pub codes: Tally,
    pub sources: Tally,
}

fn or_empty(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        EMPTY_LABEL
    } else {
        value
    }
}

/// Tally a detailed CSV table given as text.
pub fn tally(text: &str) -> Result<ChartTallies, DiagError> {
    let mut rows = csv::parse(text).into_iter();
    let header = rows.next().unwrap_or_default();

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !header.iter().any(|h| h == *column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(DiagError::MissingColumns(missing));
    }
    let column = |name: &str| header.iter().position(|h| h == name);
    let (day, version, file, code, source) = (
        column("day"),
        column("version"),
        column("file"),
        column("code"),
        column("source"),
    );

    let mut tallies = ChartTallies::default();
    for row in rows {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("");

        let collection = [cell(day).trim(), cell(version).trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        tallies.collections.add(if collection.is_empty() {
            UNKNOWN_COLLECTION
        } else {
            collection.as_str()
        });
        tallies.files.add(or_empty(cell(file)));
        tallies.codes.add(or_empty(cell(code)));
        tallies.sources.add(or_empty(cell(source)));
        tallies.total += 1;
    }
    Ok(tallies)
}

/// What a charts run wrote.
#[derive(Debug, Clone)]
pub struct ChartsOutcome {
    pub out_dir: PathBuf,
    pub total: usize,
    pub files_written: Vec<PathBuf>,
}

/// Renders the charts and summary for one detailed table.
pub struct ChartRenderer {
    input_csv: PathBuf,
    out_dir: PathBuf,
    top_n: usize,
    max_input_size: u64,
}

impl ChartRenderer {
    pub fn new(args: &ChartsArgs, config: &DiagConfig) -> Result<Self> {
        let top_n = args.top_n.unwrap_or(config.charts.top_n);
        let top_n = usize::try_from(top_n)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| DiagError::InvalidOption(format!("--top-n must be > 0 (got {top_n})")))?;

        Ok(ChartRenderer {
            input_csv: args.input_csv.clone(),
            out_dir: args.out_dir.clone().unwrap_or_else(|| config.charts.out_dir.clone()),
            top_n,
            max_input_size: config.limits.max_input_size,
        })
    }

    fn read_input(&self) -> Result<String, DiagError> {
        let path = &self.input_csv;
        if !path.is_file() {
            return Err(DiagError::NoUsableInput(format!(
                "input CSV not found: {}",
                path.display()
            )));
        }
        let size = std::fs::metadata(path).map_err(|e| DiagError::io(path, e))?.len();
        if size > self.max_input_size {
            return Err(DiagError::OversizedInput {
                path: path.clone(),
                size,
                limit: self.max_input_size,
            });
        }
        std::fs::read_to_string(path).map_err(|e| DiagError::io(path, e))
    }

    fn write(&self, name: &str, content: &str, written: &mut Vec<PathBuf>) -> Result<()> {
        let path = self.out_dir.join(name);
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
        Ok(())
    }

    pub fn run(&self) -> Result<ChartsOutcome> {
        let tallies = tally(&self.read_input()?)?;
        info!(
            "Tallied {} diagnostics from {}",
            tallies.total,
            self.input_csv.display()
        );

        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating {}", self.out_dir.display()))?;
        let n = self.top_n;
        let charts = [
            (
                "01_collect_overview.svg",
                "Diagnostics per collection (day | version)".to_string(),
                tallies.collections.top(n),
            ),
            ("02_top_files.svg", format!("Top {n} files"), tallies.files.top(n)),
            ("03_top_codes.svg", format!("Top {n} codes"), tallies.codes.top(n)),
            ("04_sources.svg", "Diagnostics per source".to_string(), tallies.sources.top(n)),
        ];

        let mut written = Vec::new();
        for (name, title, items) in &charts {
            self.write(name, &svg::bar_chart(title, items), &mut written)?;
        }
        self.write("summary.md", &markdown::summary(&tallies, n), &mut written)?;
        info!("Charts written to {}", self.out_dir.display());

        Ok(ChartsOutcome {
            out_dir: self.out_dir.clone(),
            total: tallies.total,
            files_written: written,
        })
    }
}

/// Shorthand used by the terminal status line.
pub fn describe(outcome: &ChartsOutcome) -> String {
    format!(
        "{} charts and summary for {} diagnostics in {}",
        outcome.files_written.len().saturating_sub(1),
        outcome.total,
        outcome.out_dir.display()
    )
}
