//! # Schedule Subcommand
//!
//! Exports and validates tariff schedules.
//!
//! ## Commands
//!
//! - `landfee schedule dump` — print the active schedule as YAML, a starting
//!   point for an operator-maintained schedule file.
//! - `landfee schedule check <FILE>` — parse and validate a schedule file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use landfee_tariff::TariffSchedule;

/// Arguments for the `landfee schedule` subcommand.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

/// Schedule subcommands.
#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Print the active schedule as YAML.
    Dump,

    /// Validate a schedule file.
    Check {
        /// Path to the YAML schedule.
        path: PathBuf,
    },
}

/// Execute the schedule subcommand.
pub fn run_schedule(args: &ScheduleArgs, schedule: &TariffSchedule) -> Result<u8> {
    match &args.command {
        ScheduleCommand::Dump => {
            print!("{}", schedule.to_yaml()?);
            Ok(0)
        }
        ScheduleCommand::Check { path } => cmd_check(path),
    }
}

fn cmd_check(path: &Path) -> Result<u8> {
    let schedule = TariffSchedule::load(path)
        .with_context(|| format!("schedule {} is invalid", path.display()))?;
    println!(
        "OK: {}: {} zones, {} layout bands, currency {}",
        path.display(),
        schedule.zones.zones().len(),
        schedule.layout_bands.len(),
        schedule.currency
    );
    Ok(0)
}
