pub mod file_walker;
pub mod loader;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::cli::{MergeArgs, ReportArgs};
use crate::config::DiagConfig;
use crate::diagnostics;
use crate::error::DiagError;
use crate::report::aggregate::{self, ReportFilters};
use crate::report::merger::{self, MergeOutcome};
use crate::report::table::{Collection, ReportTables, DETAILED_HEADER, PER_FILE_HEADER};
use crate::report::{csv, json};

/// Create the parent directory of an output file if needed.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display())),
        _ => Ok(()),
    }
}

/// Merges export files into one deduplicated JSON list.
pub struct Merger {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    dedup: bool,
    max_input_size: u64,
}

impl Merger {
    pub fn new(args: &MergeArgs, config: &DiagConfig) -> Result<Self> {
        let inputs = match args.inputs_dir {
            Some(ref dir) => {
                let pattern = args.glob.as_deref().unwrap_or(&config.merge.glob);
                info!("Discovering '{}' in {}", pattern, dir.display());
                file_walker::walk_inputs(dir, pattern)?
            }
            None => args
                .input_list()
                .into_iter()
                .filter(|path| {
                    let exists = path.is_file();
                    if !exists {
                        warn!("Input not found: {}", path.display());
                    }
                    exists
                })
                .collect(),
        };

        Ok(Merger {
            inputs,
            output: args.output.clone(),
            dedup: config.merge.dedup && !args.no_dedup,
            max_input_size: config.limits.max_input_size,
        })
    }

    /// Read every input, merge, deduplicate and write the output list.
    pub fn run(&self) -> Result<MergeOutcome> {
        if self.inputs.is_empty() {
            return Err(DiagError::NoUsableInput("no input files found".into()).into());
        }
        info!("Merging {} input files", self.inputs.len());

        let mut documents = Vec::with_capacity(self.inputs.len());
        let mut failed = 0;
        for path in &self.inputs {
            match loader::load_document(path, self.max_input_size) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    failed += 1;
                    warn!("Failed to read {}: {}", path.display(), e);
                }
            }
        }
        let documents_read = documents.len();
        if documents_read == 0 {
            return Err(DiagError::NoUsableInput(format!(
                "none of the {} input files could be read",
                self.inputs.len()
            ))
            .into());
        }

        let merged = merger::merge_documents(documents);
        let records_in = merged.len();
        let records = if self.dedup {
            merger::deduplicate(merged)
        } else {
            merged
        };
        debug!("{} diagnostics in, {} out", records_in, records.len());

        ensure_parent_dir(&self.output)?;
        let rendered = json::render(&records)?;
        std::fs::write(&self.output, rendered).map_err(|e| DiagError::io(&self.output, e))?;
        info!("Merged diagnostics written to {}", self.output.display());

        Ok(MergeOutcome {
            records,
            inputs: self.inputs.len(),
            documents_read,
            documents_failed: failed,
            records_in,
        })
    }
}

/// Turns a merged diagnostics list into the two CSV tables.
pub struct Reporter {
    input: PathBuf,
    out_simple: PathBuf,
    out_detailed: PathBuf,
    filters: ReportFilters,
    collection: Collection,
    max_input_size: u64,
}

fn validate_day(day: &str) -> Result<(), DiagError> {
    if day.is_empty() {
        return Ok(());
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| DiagError::InvalidOption(format!("--day must be YYYY-MM-DD (got '{day}')")))
}

impl Reporter {
    /// Resolve options against the config. Every option is validated here,
    /// before any input is read.
    pub fn new(args: &ReportArgs, config: &DiagConfig) -> Result<Self> {
        let cfg = &config.report;
        let filters = ReportFilters::from_options(
            args.source.as_deref().unwrap_or(&cfg.source),
            args.code.as_deref().unwrap_or(&cfg.code),
            args.message_contains.as_deref().unwrap_or(&cfg.message_contains),
            args.max_items.unwrap_or(cfg.max_items),
        )?;
        validate_day(&args.day)?;

        Ok(Reporter {
            input: args.input.clone(),
            out_simple: args.out_simple.clone(),
            out_detailed: args.out_detailed.clone(),
            filters,
            collection: Collection {
                day: args.day.clone(),
                version: args.collection_version.clone(),
            },
            max_input_size: config.limits.max_input_size,
        })
    }

    pub fn run(&self) -> Result<ReportTables> {
        if !self.input.is_file() {
            return Err(DiagError::NoUsableInput(format!(
                "input file not found: {}",
                self.input.display()
            ))
            .into());
        }

        let document = loader::load_document(&self.input, self.max_input_size)?;
        let records = diagnostics::extract_records(document);
        info!("Loaded {} diagnostics from {}", records.len(), self.input.display());

        let tables = aggregate::aggregate(&records, &self.filters, self.collection.clone());
        if tables.skipped_invalid > 0 {
            warn!(
                "{} diagnostic(s) skipped: invalid format (source/message)",
                tables.skipped_invalid
            );
        }

        ensure_parent_dir(&self.out_simple)?;
        csv::write_table(&self.out_simple, &PER_FILE_HEADER, tables.per_file_rows())?;
        ensure_parent_dir(&self.out_detailed)?;
        csv::write_table(&self.out_detailed, &DETAILED_HEADER, tables.detailed_rows())?;
        info!(
            "Tables written to {} and {}",
            self.out_simple.display(),
            self.out_detailed.display()
        );

        Ok(tables)
    }
}
