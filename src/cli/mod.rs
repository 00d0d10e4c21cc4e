pub mod commands;

use clap::Parser;

pub use commands::{ChartsArgs, Commands, MergeArgs, ReportArgs};

/// diagtrack: track editor diagnostics across builds
///
/// Merges VS Code "Problems" exports, deduplicates them, and reports them as
/// CSV tables and charts.
#[derive(Parser, Debug)]
#[command(
    name = "diagtrack",
    version,
    about = "Merge, deduplicate and report editor diagnostic exports",
    long_about = "diagtrack merges diagnostic exports (e.g. VS Code Problems JSON),\nremoves duplicates across capture files, and reports them per file and per\ndiagnostic as CSV tables and charts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress status output; warnings and errors are still logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Ignore .diagtrack.toml config files
    #[arg(long, global = true)]
    pub no_config: bool,
}
