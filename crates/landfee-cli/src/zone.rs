//! # Zone Subcommand
//!
//! Inspects the zone registry of the active schedule.
//!
//! ## Commands
//!
//! - `landfee zone resolve <AREA>` — which zone an administrative area is in.
//! - `landfee zone list` — every zone with its areas and schedule size.
//! - `landfee zone tier --zone <KEY> --plot-size <N>` — the schedule row
//!   and overflow for one plot.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use landfee_core::{format_currency, Decimal, ZoneKey};
use landfee_tariff::TariffSchedule;

use crate::OutputFormat;

/// Arguments for the `landfee zone` subcommand.
#[derive(Args, Debug)]
pub struct ZoneArgs {
    #[command(subcommand)]
    pub command: ZoneCommand,
}

/// Zone subcommands.
#[derive(Subcommand, Debug)]
pub enum ZoneCommand {
    /// Resolve an administrative area to its zone.
    Resolve {
        /// Area name or address fragment.
        area: String,
    },

    /// List every zone in resolution order.
    List {
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the schedule row a plot falls in.
    Tier {
        /// Zone key.
        #[arg(long)]
        zone: ZoneKey,

        /// Plot size in square metres.
        #[arg(long)]
        plot_size: Decimal,
    },
}

/// Execute the zone subcommand.
pub fn run_zone(args: &ZoneArgs, schedule: &TariffSchedule) -> Result<u8> {
    match &args.command {
        ZoneCommand::Resolve { area } => cmd_resolve(area, schedule),
        ZoneCommand::List { format } => cmd_list(*format, schedule),
        ZoneCommand::Tier { zone, plot_size } => cmd_tier(zone, *plot_size, schedule),
    }
}

fn cmd_resolve(area: &str, schedule: &TariffSchedule) -> Result<u8> {
    match schedule.zones.resolve(area) {
        Some(key) => {
            let zone = schedule.zones.get(key)?;
            println!("{key}: {}", zone.name);
            Ok(0)
        }
        None => {
            eprintln!("No zone lists an area matching {area:?}.");
            Ok(1)
        }
    }
}

fn cmd_list(format: OutputFormat, schedule: &TariffSchedule) -> Result<u8> {
    let zones = schedule.zones.zones();
    match format {
        OutputFormat::Text => {
            println!("Zones ({}):", zones.len());
            for zone in zones {
                println!(
                    "  {}: {} ({} tiers up to {} m², {} per extra large unit)",
                    zone.key,
                    zone.name,
                    zone.tiers.tiers().len(),
                    zone.tiers.max_covered(),
                    format_currency(zone.additional_unit_fee, schedule.currency),
                );
                println!("      {}", zone.areas.join(", "));
            }
        }
        OutputFormat::Json => {
            let listing: Vec<_> = zones
                .iter()
                .map(|zone| {
                    json!({
                        "key": zone.key,
                        "name": zone.name,
                        "areas": zone.areas,
                        "tiers": zone.tiers.tiers().len(),
                        "max_covered": zone.tiers.max_covered(),
                        "additional_unit_fee": zone.additional_unit_fee,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(0)
}

fn cmd_tier(key: &ZoneKey, plot_size: Decimal, schedule: &TariffSchedule) -> Result<u8> {
    let zone = schedule.zones.get(key)?;
    let money = |amount| format_currency(amount, schedule.currency);
    match zone.tiers.tier_for(plot_size) {
        Some(tier) => println!(
            "{key}: {plot_size} m² in {}-{} m², fee {}",
            tier.min,
            tier.max,
            money(tier.fee)
        ),
        None => {
            let units = zone.overflow_units(plot_size, schedule.large_unit_area)?;
            println!(
                "{key}: {plot_size} m² beyond the {} m² schedule, fee {} + {units} x {}",
                zone.tiers.max_covered(),
                money(zone.tiers.lookup(plot_size)),
                money(zone.additional_unit_fee)
            );
        }
    }
    Ok(0)
}
