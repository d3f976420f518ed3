//! # landfee CLI entry point
//!
//! Parses command-line arguments, loads the tariff schedule and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use landfee_cli::quote::{run_quote, QuoteArgs};
use landfee_cli::schedule::{run_schedule, ScheduleArgs};
use landfee_cli::zone::{run_zone, ZoneArgs};
use landfee_cli::{exit_code, load_schedule};

/// Land-survey and due-diligence fee calculator.
///
/// Quotes survey and due-diligence fees from a tariff schedule, resolves
/// administrative areas to tariff zones, and validates schedule files.
#[derive(Parser, Debug)]
#[command(name = "landfee", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Tariff schedule file (YAML). Defaults to the built-in schedule.
    #[arg(long, global = true)]
    schedule: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price a survey or due-diligence request.
    Quote(QuoteArgs),

    /// Resolve, list and inspect tariff zones.
    Zone(ZoneArgs),

    /// Dump or validate tariff schedules.
    Schedule(ScheduleArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so JSON output on stdout stays parseable.
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!("landfee CLI starting");

    let result = load_schedule(cli.schedule.as_deref()).and_then(|schedule| match &cli.command {
        Commands::Quote(args) => run_quote(args, &schedule),
        Commands::Zone(args) => run_zone(args, &schedule),
        Commands::Schedule(args) => run_schedule(args, &schedule),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}
