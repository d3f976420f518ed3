//! # landfee-tariff — Survey and Due-Diligence Fee Engine
//!
//! Converts a land-survey or due-diligence request into an itemized
//! [`BillingBreakdown`]: zone classification, tiered fee tables, percentage
//! scaling by plot count, title multipliers, overflow extrapolation for
//! oversized plots and layered markups.
//!
//! ## Architecture
//!
//! ```text
//!   area name ──▶ ZoneRegistry::resolve ──▶ ZoneKey
//!                                             │
//!   SurveyFeeRequest ──▶ SurveyQuote ─────────┤
//!                                             ▼
//!                        TariffSchedule::quote_survey ──▶ BillingBreakdown
//!
//!   DueDiligenceRequest ──▶ TariffSchedule::calculate_due_diligence_fee
//! ```
//!
//! Every constant lives in a [`TariffSchedule`]. The free functions at the
//! crate root run against [`TariffSchedule::builtin()`]; callers holding an
//! operator-supplied schedule call the methods on it directly.
//!
//! ## Concurrency
//!
//! The engine is a pure, synchronous computation. Schedules are immutable
//! after construction and the built-in one is initialised exactly once, so
//! any number of threads may quote concurrently without locking.
//!
//! ## Crate Policy
//!
//! - No I/O outside [`TariffSchedule::load()`].
//! - No `panic!()` or `.unwrap()` outside tests. Money arithmetic is
//!   checked; amounts too large to represent are
//!   [`TariffError::AmountOutOfRange`].
//! - Logging is `tracing` at debug/trace level only.

pub mod coordinates;
mod defaults;
pub mod due_diligence;
pub mod schedule;
pub mod survey;
pub mod tier;
pub mod zone;

pub use coordinates::CoordinatesPicking;
pub use due_diligence::{ClientTables, ClientType, DueDiligenceRequest, DueDiligenceTariff};
pub use schedule::{PlanFilingTariff, ServiceCharge, TariffSchedule};
pub use survey::{
    LayoutBand, ServiceSubKind, SurveyFeeRequest, SurveyKind, SurveyQuote, SurveyService,
    TitleType,
};
pub use tier::{FeeTier, TierTable};
pub use zone::{Zone, ZoneRegistry};

pub use landfee_core::{
    format_currency, BillingBreakdown, BillingItem, Currency, Decimal, TariffError, ZoneKey,
};

/// Resolve an administrative-area name to a zone key using the built-in
/// schedule. Matching is case-insensitive and substring-based; `None` when
/// no zone lists a matching area.
pub fn resolve_zone(area_name: &str) -> Option<ZoneKey> {
    TariffSchedule::builtin().zones.resolve(area_name).cloned()
}

/// Price a survey request against the built-in schedule.
pub fn calculate_survey_fee(request: &SurveyFeeRequest) -> Result<BillingBreakdown, TariffError> {
    TariffSchedule::builtin().calculate_survey_fee(request)
}

/// Price a due-diligence search against the built-in schedule.
pub fn calculate_due_diligence_fee(
    land_area: Decimal,
    client_type: ClientType,
) -> Result<BillingBreakdown, TariffError> {
    TariffSchedule::builtin().calculate_due_diligence_fee(&DueDiligenceRequest {
        land_area,
        client_type,
    })
}

/// Coordinates-picking fee for `base_fee` under the built-in schedule.
///
/// Fails only when `base_fee` is too large to price.
pub fn coordinates_picking_fee(base_fee: Decimal) -> Result<Decimal, TariffError> {
    TariffSchedule::builtin().coordinates_picking.fee(base_fee)
}
