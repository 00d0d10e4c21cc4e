use clap::{ArgGroup, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge and deduplicate diagnostic exports into one JSON list
    Merge(MergeArgs),

    /// Filter merged diagnostics and write the per-file and detailed CSV tables
    Report(ReportArgs),

    /// Render SVG charts and a Markdown summary from a detailed CSV table
    Charts(ChartsArgs),

    /// Initialize a .diagtrack.toml config file in the current directory
    Init,
}

#[derive(clap::Args, Debug)]
#[command(group(
    ArgGroup::new("input_source")
        .required(true)
        .args(["inputs", "inputs_dir"]),
))]
pub struct MergeArgs {
    /// Comma-separated list of JSON export files
    #[arg(long)]
    pub inputs: Option<String>,

    /// Directory containing JSON exports
    #[arg(long)]
    pub inputs_dir: Option<PathBuf>,

    /// Glob pattern used with --inputs-dir (default: *.json)
    #[arg(long)]
    pub glob: Option<String>,

    /// Output JSON path (written as a JSON list)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep duplicate diagnostics
    #[arg(long)]
    pub no_dedup: bool,
}

impl MergeArgs {
    /// Paths given through --inputs, trimmed and without blanks.
    pub fn input_list(&self) -> Vec<PathBuf> {
        self.inputs
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Merged diagnostics JSON
    #[arg(short, long)]
    pub input: PathBuf,

    /// Per-file CSV output (day;version;file;count)
    #[arg(long)]
    pub out_simple: PathBuf,

    /// Detailed CSV output (day;version;file;line;column;code;source;message)
    #[arg(long)]
    pub out_detailed: PathBuf,

    /// Only report diagnostics from this tool; "*" disables the filter (default: clangd)
    #[arg(long)]
    pub source: Option<String>,

    /// Only report this diagnostic code, e.g. unused-includes
    #[arg(long)]
    pub code: Option<String>,

    /// Only report messages containing this text (case-sensitive)
    #[arg(long)]
    pub message_contains: Option<String>,

    /// Collection day (YYYY-MM-DD) written to both tables
    #[arg(long, default_value = "")]
    pub day: String,

    /// Collection version written to both tables
    #[arg(long = "version", default_value = "")]
    pub collection_version: String,

    /// Maximum number of diagnostics to report after filtering (0 = unlimited)
    #[arg(long, allow_negative_numbers = true)]
    pub max_items: Option<i64>,
}

#[derive(clap::Args, Debug)]
pub struct ChartsArgs {
    /// Detailed CSV produced by `diagtrack report`
    #[arg(long)]
    pub input_csv: PathBuf,

    /// Output directory for the SVG charts and summary.md (default: charts)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Number of entries per chart (default: 20)
    #[arg(long, allow_negative_numbers = true)]
    pub top_n: Option<i64>,
}
