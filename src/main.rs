mod charts;
mod cli;
mod config;
mod diagnostics;
mod engine;
mod error;
mod report;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use charts::ChartRenderer;
use cli::{Cli, Commands};
use config::DiagConfig;
use engine::{Merger, Reporter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_directive(&cli)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    debug!("diagtrack v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(()) => ExitCode::from(error::EXIT_OK),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(error::exit_code_for(&e))
        }
    }
}

/// Quiet runs still log warnings so skipped documents and records stay visible.
fn log_directive(cli: &Cli) -> &'static str {
    if cli.verbose {
        "diagtrack=debug"
    } else if cli.quiet {
        "diagtrack=warn"
    } else {
        "diagtrack=info"
    }
}

fn load_config(cli: &Cli) -> Result<DiagConfig> {
    if cli.no_config {
        return Ok(DiagConfig::default());
    }
    Ok(DiagConfig::load(&std::env::current_dir()?))
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Merge(args) => {
            let config = load_config(cli)?;
            let outcome = Merger::new(args, &config)?.run()?;
            if !cli.quiet {
                report::terminal::render_merge(&outcome, &args.output);
            }
        }
        Commands::Report(args) => {
            let config = load_config(cli)?;
            let tables = Reporter::new(args, &config)?.run()?;
            if !cli.quiet {
                report::terminal::render_report(&tables);
            }
        }
        Commands::Charts(args) => {
            let config = load_config(cli)?;
            let outcome = ChartRenderer::new(args, &config)?.run()?;
            if !cli.quiet {
                println!("{} {}", report::terminal::ok_marker(), charts::describe(&outcome));
            }
        }
        Commands::Init => {
            let dir = std::env::current_dir()?;
            if config::init_config(&dir)? {
                info!("Created {}", config::CONFIG_FILE);
            } else {
                info!("{} already exists in this directory", config::CONFIG_FILE);
            }
        }
    }

    Ok(())
}
