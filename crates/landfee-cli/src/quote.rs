//! # Quote Subcommand
//!
//! Prices survey and due-diligence requests against the active schedule.
//!
//! ## Commands
//!
//! - `landfee quote survey (--zone <KEY> | --area <NAME>) --plot-size <N> [--kind <KIND>] ...`
//! - `landfee quote due-diligence --land-area <N> [--client individual|corporate]`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use landfee_core::{Decimal, TariffError, ZoneKey};
use landfee_tariff::{
    ClientType, DueDiligenceRequest, ServiceSubKind, SurveyFeeRequest, SurveyKind,
    TariffSchedule, TitleType,
};

use crate::render::render;
use crate::OutputFormat;

/// Arguments for the `landfee quote` subcommand.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[command(subcommand)]
    pub command: QuoteCommand,
}

/// Quote subcommands.
#[derive(Subcommand, Debug)]
pub enum QuoteCommand {
    /// Price a land survey.
    Survey(SurveyArgs),
    /// Price a due-diligence search.
    DueDiligence(DueDiligenceArgs),
}

/// Arguments for `landfee quote survey`.
#[derive(Args, Debug)]
pub struct SurveyArgs {
    /// Zone key (A, B, ...).
    #[arg(long, required_unless_present = "area", conflicts_with = "area")]
    pub zone: Option<ZoneKey>,

    /// Administrative area; resolved to a zone.
    #[arg(long)]
    pub area: Option<String>,

    /// Plot size in square metres.
    #[arg(long)]
    pub plot_size: Decimal,

    /// Survey kind (standard, strata, layout, plan-filing, details,
    /// as-built, re-establishment, certificate-of-occupancy, gazette).
    #[arg(long, default_value = "standard")]
    pub kind: SurveyKind,

    /// Sub-kind for layout and plan filing (fresh-survey,
    /// existing-coordinates, direct-verification, retaking-points).
    #[arg(long)]
    pub sub_kind: Option<ServiceSubKind>,

    /// Title type (private, commercial, industrial).
    #[arg(long)]
    pub title: Option<TitleType>,

    /// Units (strata) or plots (layout).
    #[arg(long)]
    pub units: Option<u32>,

    /// Missing boundary markers (re-establishment).
    #[arg(long)]
    pub missing_markers: Option<u32>,

    /// Total boundary markers (re-establishment).
    #[arg(long)]
    pub total_markers: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for `landfee quote due-diligence`.
#[derive(Args, Debug)]
pub struct DueDiligenceArgs {
    /// Land area in square metres.
    #[arg(long)]
    pub land_area: Decimal,

    /// Client type (individual, corporate).
    #[arg(long, default_value = "individual")]
    pub client: ClientType,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Execute the quote subcommand.
pub fn run_quote(args: &QuoteArgs, schedule: &TariffSchedule) -> Result<u8> {
    match &args.command {
        QuoteCommand::Survey(survey) => cmd_survey(survey, schedule),
        QuoteCommand::DueDiligence(dd) => cmd_due_diligence(dd, schedule),
    }
}

/// Build the engine request from command-line arguments.
pub fn survey_request(args: &SurveyArgs, schedule: &TariffSchedule) -> Result<SurveyFeeRequest> {
    let zone = match (&args.zone, &args.area) {
        (Some(zone), _) => zone.clone(),
        (None, Some(area)) => schedule
            .zones
            .resolve(area)
            .cloned()
            .ok_or_else(|| TariffError::UnknownZone(area.clone()))
            .with_context(|| format!("area {area:?} is not in any zone"))?,
        (None, None) => return Err(TariffError::MissingParameter { field: "zone" }.into()),
    };
    Ok(SurveyFeeRequest {
        zone,
        plot_size: args.plot_size,
        survey_kind: args.kind,
        service_sub_kind: args.sub_kind,
        title_type: args.title,
        unit_count: args.units,
        missing_marker_count: args.missing_markers,
        total_marker_count: args.total_markers,
    })
}

fn cmd_survey(args: &SurveyArgs, schedule: &TariffSchedule) -> Result<u8> {
    let request = survey_request(args, schedule)?;
    tracing::info!(zone = %request.zone, kind = %request.survey_kind, "quoting survey");
    let breakdown = schedule
        .calculate_survey_fee(&request)
        .with_context(|| format!("cannot quote {} survey", request.survey_kind))?;
    print!("{}", render(&breakdown, schedule.tax_rate, args.format)?);
    Ok(0)
}

fn cmd_due_diligence(args: &DueDiligenceArgs, schedule: &TariffSchedule) -> Result<u8> {
    let request = DueDiligenceRequest {
        land_area: args.land_area,
        client_type: args.client,
    };
    tracing::info!(client = %request.client_type, "quoting due diligence");
    let breakdown = schedule
        .calculate_due_diligence_fee(&request)
        .context("cannot quote due diligence")?;
    print!("{}", render(&breakdown, schedule.tax_rate, args.format)?);
    Ok(0)
}
