//! # landfee-cli — Command-Line Front End for the Fee Engine
//!
//! Provides the `landfee` binary: quotes for surveys and due-diligence
//! searches, zone lookups, and tariff schedule maintenance.
//!
//! ## Subcommands
//!
//! - `landfee quote survey` / `landfee quote due-diligence` — price a request.
//! - `landfee zone resolve|list|tier` — inspect the zone registry.
//! - `landfee schedule dump|check` — export or validate a YAML schedule.
//!
//! ```bash
//! landfee quote survey --area Ikoyi --plot-size 500
//! landfee --schedule lagos-2026.yaml quote due-diligence --land-area 800 --client corporate
//! landfee schedule check lagos-2026.yaml
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | other failure (I/O, serialization) or negative answer |
//! | 2 | request rejected (missing or invalid parameter) |
//! | 3 | service not offered yet |
//! | 4 | reference data problem (unknown zone, malformed schedule) |
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the handler modules; fee logic lives in
//!   `landfee-tariff`.

pub mod quote;
pub mod render;
pub mod schedule;
pub mod zone;

use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;

use landfee_core::{ErrorDisposition, TariffError};
use landfee_tariff::TariffSchedule;

/// Output format for commands that print a breakdown or listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// The built-in schedule, or the schedule file at `path`.
pub fn load_schedule(path: Option<&Path>) -> anyhow::Result<Cow<'static, TariffSchedule>> {
    match path {
        None => Ok(Cow::Borrowed(TariffSchedule::builtin())),
        Some(path) => {
            let schedule = TariffSchedule::load(path)
                .with_context(|| format!("failed to load schedule {}", path.display()))?;
            Ok(Cow::Owned(schedule))
        }
    }
}

/// Map an error to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let disposition = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<TariffError>())
        .map(TariffError::disposition);
    match disposition {
        Some(ErrorDisposition::FormValidation) => 2,
        Some(ErrorDisposition::ComingSoon) => 3,
        Some(ErrorDisposition::DataIntegrity) => 4,
        Some(ErrorDisposition::Internal) | None => 1,
    }
}
