//! # Survey Fee Calculator
//!
//! Turns a survey request into an itemized [`BillingBreakdown`].
//!
//! ## Requests
//!
//! Callers submit a flat [`SurveyFeeRequest`] (the shape a form or JSON body
//! has). It is converted into a [`SurveyQuote`] whose [`SurveyService`]
//! variant carries exactly the counts its kind needs, so a marker count can
//! never reach a standard survey and a layout always has a plot count.
//!
//! ## Pipeline
//!
//! ```text
//! zone ──▶ tier fee ──▶ + overflow ──▶ base fee
//!                                        │
//!            service charge ◀────────────┤  (all kinds but plan filing)
//!                                        ▼
//!                         title multiplier (×2 commercial / industrial)
//!                                        │
//!                                        ▼
//!                          kind-specific charge line(s)
//!                                        │
//!            residual markup ◀───────────┤  (requests without a sub-kind)
//!                                        ▼
//!                                tax (taxable kinds)
//! ```
//!
//! The service charge and residual markup are not customer-facing lines;
//! they are recorded as [`AdjustmentKind`] entries so the subtotal always
//! reconciles against what the breakdown lists.

use std::num::NonZeroU32;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use landfee_core::money::{ceil_units, checked_product, checked_sum, rate_of, round_minor};
use landfee_core::{
    AdjustmentKind, BillingBreakdown, BillingItem, BreakdownBuilder, TariffError, ZoneKey,
};

use crate::schedule::TariffSchedule;
use crate::zone::Zone;

// ─── Kinds ───────────────────────────────────────────────────────────

/// The survey product being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurveyKind {
    /// Survey of a single plot.
    Standard,
    /// Subdivision of a plot into units.
    Strata,
    /// Multi-plot estate layout.
    Layout,
    /// Filing of a survey plan.
    PlanFiling,
    /// Detail survey.
    Details,
    /// As-built survey.
    AsBuilt,
    /// Re-establishment of missing boundary markers.
    ReEstablishment,
    /// Certificate-of-occupancy processing. Not offered yet.
    CertificateOfOccupancy,
    /// Gazette search. Not offered yet.
    Gazette,
}

impl SurveyKind {
    /// Every kind, in display order.
    pub const ALL: [SurveyKind; 9] = [
        Self::Standard,
        Self::Strata,
        Self::Layout,
        Self::PlanFiling,
        Self::Details,
        Self::AsBuilt,
        Self::ReEstablishment,
        Self::CertificateOfOccupancy,
        Self::Gazette,
    ];

    /// Returns the kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Strata => "strata",
            Self::Layout => "layout",
            Self::PlanFiling => "plan-filing",
            Self::Details => "details",
            Self::AsBuilt => "as-built",
            Self::ReEstablishment => "re-establishment",
            Self::CertificateOfOccupancy => "certificate-of-occupancy",
            Self::Gazette => "gazette",
        }
    }

    /// Customer-facing name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard survey",
            Self::Strata => "Strata survey",
            Self::Layout => "Layout survey",
            Self::PlanFiling => "Plan filing",
            Self::Details => "Detail survey",
            Self::AsBuilt => "As-built survey",
            Self::ReEstablishment => "Boundary re-establishment",
            Self::CertificateOfOccupancy => "Certificate of occupancy",
            Self::Gazette => "Gazette search",
        }
    }

    /// Whether fees can be quoted for this kind.
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::CertificateOfOccupancy | Self::Gazette)
    }

    /// Whether the breakdown is taxed. Plan filing is the one exempt kind.
    pub fn is_taxable(&self) -> bool {
        !matches!(self, Self::PlanFiling)
    }

    /// Whether the back-office service charge applies.
    pub fn charges_service_fee(&self) -> bool {
        !matches!(self, Self::PlanFiling)
    }

    /// Whether a [`ServiceSubKind`] may refine this kind.
    pub fn accepts_sub_kind(&self) -> bool {
        matches!(self, Self::Layout | Self::PlanFiling)
    }
}

impl std::fmt::Display for SurveyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurveyKind {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalise_ident(s);
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                TariffError::invalid("survey_kind", format!("unknown survey kind {s:?}"))
            })
    }
}

/// Refinement of a layout or plan-filing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceSubKind {
    /// Coordinates are picked on a fresh survey.
    FreshSurvey,
    /// Coordinates already exist.
    ExistingCoordinates,
    /// Direct verification of an existing plan.
    DirectVerification,
    /// Boundary points are retaken.
    RetakingPoints,
}

impl ServiceSubKind {
    /// Every sub-kind, in display order.
    pub const ALL: [ServiceSubKind; 4] = [
        Self::FreshSurvey,
        Self::ExistingCoordinates,
        Self::DirectVerification,
        Self::RetakingPoints,
    ];

    /// Returns the kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreshSurvey => "fresh-survey",
            Self::ExistingCoordinates => "existing-coordinates",
            Self::DirectVerification => "direct-verification",
            Self::RetakingPoints => "retaking-points",
        }
    }

    /// Lower-case label used inside line descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FreshSurvey => "fresh survey",
            Self::ExistingCoordinates => "existing coordinates",
            Self::DirectVerification => "direct verification",
            Self::RetakingPoints => "retaking points",
        }
    }
}

impl std::fmt::Display for ServiceSubKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceSubKind {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalise_ident(s);
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                TariffError::invalid("service_sub_kind", format!("unknown sub-kind {s:?}"))
            })
    }
}

/// Land-use classification of the title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleType {
    /// Residential or private use.
    #[default]
    Private,
    /// Commercial use; doubles the survey fee.
    Commercial,
    /// Industrial use; doubles the survey fee.
    Industrial,
}

impl TitleType {
    /// Returns the kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
        }
    }

    /// Whether the survey fee is doubled for this title.
    pub fn doubles_fee(&self) -> bool {
        matches!(self, Self::Commercial | Self::Industrial)
    }
}

impl std::fmt::Display for TitleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TitleType {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_ident(s).as_str() {
            "private" => Ok(Self::Private),
            "commercial" => Ok(Self::Commercial),
            "industrial" => Ok(Self::Industrial),
            _ => Err(TariffError::invalid(
                "title_type",
                format!("unknown title type {s:?}"),
            )),
        }
    }
}

fn normalise_ident(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

// ─── Requests ────────────────────────────────────────────────────────

/// A survey request as submitted by a form or API body.
///
/// Optional counts are only meaningful for some kinds; conversion into a
/// [`SurveyQuote`] rejects absent required counts and counts supplied to a
/// kind that does not take them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyFeeRequest {
    /// Tariff zone of the plot.
    pub zone: ZoneKey,
    /// Plot size in area units; must be positive.
    pub plot_size: Decimal,
    /// Product being priced.
    pub survey_kind: SurveyKind,
    /// Refinement for layout and plan filing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_sub_kind: Option<ServiceSubKind>,
    /// Title classification; private when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_type: Option<TitleType>,
    /// Units (strata) or plots (layout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_count: Option<u32>,
    /// Missing boundary markers (re-establishment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_marker_count: Option<u32>,
    /// Boundary markers on the plot (re-establishment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_marker_count: Option<u32>,
}

impl SurveyFeeRequest {
    /// A request with no optional fields set.
    pub fn new(zone: ZoneKey, plot_size: Decimal, survey_kind: SurveyKind) -> Self {
        Self {
            zone,
            plot_size,
            survey_kind,
            service_sub_kind: None,
            title_type: None,
            unit_count: None,
            missing_marker_count: None,
            total_marker_count: None,
        }
    }

    /// Set the sub-kind.
    pub fn with_sub_kind(mut self, sub_kind: ServiceSubKind) -> Self {
        self.service_sub_kind = Some(sub_kind);
        self
    }

    /// Set the title type.
    pub fn with_title(mut self, title: TitleType) -> Self {
        self.title_type = Some(title);
        self
    }

    /// Set the unit or plot count.
    pub fn with_units(mut self, units: u32) -> Self {
        self.unit_count = Some(units);
        self
    }

    /// Set the marker counts.
    pub fn with_markers(mut self, missing: u32, total: u32) -> Self {
        self.missing_marker_count = Some(missing);
        self.total_marker_count = Some(total);
        self
    }
}

/// A survey kind together with exactly the parameters it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SurveyService {
    /// Single-plot survey.
    Standard,
    /// Subdivision into `units` units.
    Strata {
        /// Number of units.
        units: NonZeroU32,
    },
    /// Estate layout of `plots` plots.
    Layout {
        /// Number of plots.
        plots: NonZeroU32,
        /// Optional refinement.
        sub_kind: Option<ServiceSubKind>,
    },
    /// Plan filing.
    PlanFiling {
        /// Optional refinement.
        sub_kind: Option<ServiceSubKind>,
    },
    /// Detail survey.
    Details,
    /// As-built survey.
    AsBuilt,
    /// Re-establishment of `missing_markers` out of `total_markers`.
    ReEstablishment {
        /// Markers to re-establish.
        missing_markers: NonZeroU32,
        /// Markers on the plot; never fewer than `missing_markers`.
        total_markers: NonZeroU32,
    },
    /// Certificate of occupancy.
    CertificateOfOccupancy,
    /// Gazette search.
    Gazette,
}

impl SurveyService {
    /// The kind this service belongs to.
    pub fn kind(&self) -> SurveyKind {
        match self {
            Self::Standard => SurveyKind::Standard,
            Self::Strata { .. } => SurveyKind::Strata,
            Self::Layout { .. } => SurveyKind::Layout,
            Self::PlanFiling { .. } => SurveyKind::PlanFiling,
            Self::Details => SurveyKind::Details,
            Self::AsBuilt => SurveyKind::AsBuilt,
            Self::ReEstablishment { .. } => SurveyKind::ReEstablishment,
            Self::CertificateOfOccupancy => SurveyKind::CertificateOfOccupancy,
            Self::Gazette => SurveyKind::Gazette,
        }
    }

    /// The sub-kind, for the kinds that carry one.
    pub fn sub_kind(&self) -> Option<ServiceSubKind> {
        match self {
            Self::Layout { sub_kind, .. } | Self::PlanFiling { sub_kind } => *sub_kind,
            _ => None,
        }
    }

    /// Check the constraints between a variant's fields.
    ///
    /// # Errors
    ///
    /// [`TariffError::InvalidParameter`] if more markers are missing than
    /// the plot has.
    pub fn validate(&self) -> Result<(), TariffError> {
        if let Self::ReEstablishment {
            missing_markers,
            total_markers,
        } = *self
        {
            if missing_markers > total_markers {
                return Err(TariffError::invalid(
                    "missing_marker_count",
                    format!("{missing_markers} missing exceeds {total_markers} total markers"),
                ));
            }
        }
        Ok(())
    }
}

/// A validated survey request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyQuote {
    /// Tariff zone of the plot.
    pub zone: ZoneKey,
    /// Plot size in area units.
    pub plot_size: Decimal,
    /// Title classification.
    pub title: TitleType,
    /// Product and its parameters.
    pub service: SurveyService,
}

impl TryFrom<&SurveyFeeRequest> for SurveyQuote {
    type Error = TariffError;

    fn try_from(request: &SurveyFeeRequest) -> Result<Self, Self::Error> {
        if request.plot_size <= Decimal::ZERO {
            return Err(TariffError::MissingParameter { field: "plot_size" });
        }
        let kind = request.survey_kind;
        if request.service_sub_kind.is_some() && !kind.accepts_sub_kind() {
            return Err(not_applicable("service_sub_kind", kind));
        }
        let takes_units = matches!(kind, SurveyKind::Strata | SurveyKind::Layout);
        if request.unit_count.is_some() && !takes_units {
            return Err(not_applicable("unit_count", kind));
        }
        if kind != SurveyKind::ReEstablishment {
            if request.missing_marker_count.is_some() {
                return Err(not_applicable("missing_marker_count", kind));
            }
            if request.total_marker_count.is_some() {
                return Err(not_applicable("total_marker_count", kind));
            }
        }

        let service = match kind {
            SurveyKind::Standard => SurveyService::Standard,
            SurveyKind::Strata => SurveyService::Strata {
                units: required("unit_count", request.unit_count)?,
            },
            SurveyKind::Layout => SurveyService::Layout {
                plots: required("unit_count", request.unit_count)?,
                sub_kind: request.service_sub_kind,
            },
            SurveyKind::PlanFiling => SurveyService::PlanFiling {
                sub_kind: request.service_sub_kind,
            },
            SurveyKind::Details => SurveyService::Details,
            SurveyKind::AsBuilt => SurveyService::AsBuilt,
            SurveyKind::ReEstablishment => {
                let missing_markers = required("missing_marker_count", request.missing_marker_count)?;
                let total_markers = required("total_marker_count", request.total_marker_count)?;
                SurveyService::ReEstablishment {
                    missing_markers,
                    total_markers,
                }
            }
            SurveyKind::CertificateOfOccupancy => SurveyService::CertificateOfOccupancy,
            SurveyKind::Gazette => SurveyService::Gazette,
        };
        service.validate()?;

        Ok(Self {
            zone: request.zone.clone(),
            plot_size: request.plot_size,
            title: request.title_type.unwrap_or_default(),
            service,
        })
    }
}

fn required(field: &'static str, value: Option<u32>) -> Result<NonZeroU32, TariffError> {
    value
        .and_then(NonZeroU32::new)
        .ok_or(TariffError::MissingParameter { field })
}

fn not_applicable(field: &'static str, kind: SurveyKind) -> TariffError {
    TariffError::invalid(field, format!("not applicable to {kind} surveys"))
}

// ─── Layout Bands ────────────────────────────────────────────────────

/// Share of the survey fee charged per layout plot-count band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBand {
    /// Largest plot count in the band; `None` for the final open band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<u32>,
    /// Share of the survey fee, in `(0, 1]`.
    pub percentage: Decimal,
}

impl LayoutBand {
    /// A band ending at `plots` inclusive.
    pub fn up_to(plots: u32, percentage: Decimal) -> Self {
        Self {
            up_to: Some(plots),
            percentage,
        }
    }

    /// The final band, covering every larger plot count.
    pub fn rest(percentage: Decimal) -> Self {
        Self {
            up_to: None,
            percentage,
        }
    }
}

/// Check that bands ascend, end with one open band, and never raise the share.
pub(crate) fn validate_layout_bands(bands: &[LayoutBand]) -> Result<(), TariffError> {
    let Some(last) = bands.last() else {
        return Err(TariffError::InvalidSchedule("layout bands are empty".into()));
    };
    if last.up_to.is_some() {
        return Err(TariffError::InvalidSchedule(
            "last layout band must be open-ended".into(),
        ));
    }
    let mut prev: Option<&LayoutBand> = None;
    for (i, band) in bands.iter().enumerate() {
        if band.percentage <= Decimal::ZERO || band.percentage > Decimal::ONE {
            return Err(TariffError::InvalidSchedule(format!(
                "layout band {i} share {} is outside (0, 1]",
                band.percentage
            )));
        }
        let is_last = i + 1 == bands.len();
        match band.up_to {
            None if !is_last => {
                return Err(TariffError::InvalidSchedule(format!(
                    "layout band {i} is open-ended but not last"
                )));
            }
            Some(0) => {
                return Err(TariffError::InvalidSchedule(format!(
                    "layout band {i} ends at zero plots"
                )));
            }
            _ => {}
        }
        if let Some(prev) = prev {
            if let (Some(a), Some(b)) = (prev.up_to, band.up_to) {
                if b <= a {
                    return Err(TariffError::InvalidSchedule(format!(
                        "layout band {i} does not extend past band {}",
                        i - 1
                    )));
                }
            }
            if band.percentage > prev.percentage {
                return Err(TariffError::InvalidSchedule(format!(
                    "layout band {i} raises the share over band {}",
                    i - 1
                )));
            }
        }
        prev = Some(band);
    }
    Ok(())
}

// ─── Calculator ──────────────────────────────────────────────────────

impl TariffSchedule {
    /// Share of the survey fee charged for a layout of `plots` plots.
    ///
    /// # Errors
    ///
    /// [`TariffError::InvalidSchedule`] if no band covers `plots`, which a
    /// validated schedule rules out.
    pub fn layout_percentage(&self, plots: NonZeroU32) -> Result<Decimal, TariffError> {
        self.layout_bands
            .iter()
            .find(|band| band.up_to.map_or(true, |max| plots.get() <= max))
            .map(|band| band.percentage)
            .ok_or_else(|| {
                TariffError::InvalidSchedule(format!("no layout band covers {plots} plots"))
            })
    }

    /// Price a survey request.
    ///
    /// The zone is resolved first, then unavailable kinds are refused, then
    /// the request's fields are checked for its kind.
    ///
    /// # Errors
    ///
    /// - [`TariffError::UnknownZone`] if the zone is not in the registry.
    /// - [`TariffError::ServiceUnavailable`] for kinds not offered yet.
    /// - [`TariffError::MissingParameter`] / [`TariffError::InvalidParameter`]
    ///   for absent, non-positive or inapplicable fields.
    /// - [`TariffError::AmountOutOfRange`] if the plot or counts are too
    ///   large to price.
    pub fn calculate_survey_fee(
        &self,
        request: &SurveyFeeRequest,
    ) -> Result<BillingBreakdown, TariffError> {
        self.offered_zone(&request.zone, request.survey_kind)?;
        let quote = SurveyQuote::try_from(request)?;
        self.quote_survey(&quote)
    }

    /// Price a validated survey request.
    ///
    /// The quote's fields are public, so its plot size and service are
    /// checked again here.
    pub fn quote_survey(&self, quote: &SurveyQuote) -> Result<BillingBreakdown, TariffError> {
        let kind = quote.service.kind();
        let zone = self.offered_zone(&quote.zone, kind)?;
        let plot_size = quote.plot_size;
        if plot_size <= Decimal::ZERO {
            return Err(TariffError::MissingParameter { field: "plot_size" });
        }
        quote.service.validate()?;

        let mut builder = BreakdownBuilder::new(self.currency);

        let mut base_fee = zone.tiers.lookup(plot_size);
        let extra_units = zone.overflow_units(plot_size, self.large_unit_area)?;
        if extra_units > Decimal::ZERO {
            let overflow = BillingItem::priced(
                format!(
                    "Additional area beyond {} schedule ({extra_units} large units)",
                    zone.name
                ),
                extra_units,
                zone.additional_unit_fee,
            )?
            .as_component();
            base_fee = checked_sum(base_fee, overflow.amount)?;
            builder.line(overflow);
        }

        if kind.charges_service_fee() {
            let steps = ceil_units(plot_size, self.service_charge.area_step)?;
            builder.adjust(
                AdjustmentKind::ServiceCharge,
                format!(
                    "Service charge ({steps} x {})",
                    self.service_charge.fee_per_step
                ),
                checked_product(steps, self.service_charge.fee_per_step)?,
            );
        }

        let survey_fee = if quote.title.doubles_fee() {
            builder.line(
                BillingItem::flat(format!("{} title multiplier (x2)", quote.title), base_fee)
                    .as_component(),
            );
            checked_product(base_fee, Decimal::TWO)?
        } else {
            base_fee
        };

        self.charge_lines(&mut builder, zone, &quote.service, base_fee, survey_fee)?;

        if quote.service.sub_kind().is_none() {
            builder.adjust(
                AdjustmentKind::ResidualMarkup,
                "Residual markup on base fee",
                rate_of(base_fee, self.residual_markup_rate)?,
            );
        }

        let breakdown = builder.finish(kind.is_taxable(), self.tax_rate)?;
        tracing::debug!(
            zone = %quote.zone,
            kind = %kind,
            plot_size = %plot_size,
            base_fee = %base_fee,
            total = %breakdown.total,
            "priced survey"
        );
        Ok(breakdown)
    }

    fn offered_zone(&self, key: &ZoneKey, kind: SurveyKind) -> Result<&Zone, TariffError> {
        let zone = self.zones.get(key)?;
        if !kind.is_available() {
            return Err(TariffError::ServiceUnavailable(kind.label().to_string()));
        }
        Ok(zone)
    }

    fn charge_lines(
        &self,
        builder: &mut BreakdownBuilder,
        zone: &Zone,
        service: &SurveyService,
        base_fee: Decimal,
        survey_fee: Decimal,
    ) -> Result<(), TariffError> {
        let kind = service.kind();
        let title = format!("{}, {}", kind.label(), zone.name);
        match *service {
            SurveyService::Standard => {
                builder.line(BillingItem::flat(title, survey_fee));
            }
            SurveyService::Strata { units } => {
                builder.line(BillingItem::priced(
                    title,
                    Decimal::from(units.get()),
                    survey_fee,
                )?);
            }
            SurveyService::Layout { plots, sub_kind } => {
                let share = self.layout_percentage(plots)?;
                let percent = checked_product(share, Decimal::ONE_HUNDRED)?.normalize();
                let mut fee = checked_product(survey_fee, share)?;
                let label = match sub_kind {
                    Some(ServiceSubKind::FreshSurvey) => {
                        fee = checked_sum(fee, self.coordinates_picking.fee(base_fee)?)?;
                        format!("{title} with coordinates picking")
                    }
                    Some(other) => format!("{title} ({})", other.label()),
                    None => title,
                };
                builder.line(BillingItem::flat(
                    format!("{label}: {plots} plots at {percent}%"),
                    fee,
                ));
            }
            SurveyService::PlanFiling { sub_kind } => {
                let marked_up = checked_sum(
                    survey_fee,
                    rate_of(survey_fee, self.plan_filing.markup_rate)?,
                )?;
                let flat = self.plan_filing.flat_fee;
                let (fee, with_coordinates) = match sub_kind {
                    Some(ServiceSubKind::FreshSurvey) => (marked_up, true),
                    Some(ServiceSubKind::ExistingCoordinates) => (marked_up, false),
                    Some(ServiceSubKind::DirectVerification) => (flat, false),
                    Some(ServiceSubKind::RetakingPoints) => (flat, true),
                    None => (survey_fee, false),
                };
                let label = match sub_kind {
                    Some(sub) => format!("{title} ({})", sub.label()),
                    None => title,
                };
                builder.line(BillingItem::flat(label, fee));
                if with_coordinates {
                    builder.line(BillingItem::flat(
                        "Coordinates picking",
                        self.coordinates_picking.fee(base_fee)?,
                    ));
                }
            }
            SurveyService::Details => {
                builder.line(BillingItem::flat(
                    title,
                    checked_product(survey_fee, self.details_rate)?,
                ));
            }
            SurveyService::AsBuilt => {
                builder.line(BillingItem::flat(
                    title,
                    checked_product(survey_fee, self.as_built_rate)?,
                ));
            }
            SurveyService::ReEstablishment {
                missing_markers,
                total_markers,
            } => {
                let missing = Decimal::from(missing_markers.get());
                let total = Decimal::from(total_markers.get());
                // missing <= total, so the ratio form stays in range when the
                // exact product does not.
                let scaled = match survey_fee.checked_mul(missing * missing) {
                    Some(scaled) => scaled
                        .checked_div(total * total)
                        .ok_or(TariffError::AmountOutOfRange)?,
                    None => checked_product(
                        checked_product(survey_fee, missing / total)?,
                        missing / total,
                    )?,
                };
                let fee = round_minor(scaled);
                builder.line(BillingItem::flat(
                    format!("{title} ({missing_markers} of {total_markers} markers missing)"),
                    fee,
                ));
            }
            SurveyService::CertificateOfOccupancy | SurveyService::Gazette => {
                return Err(TariffError::ServiceUnavailable(kind.label().to_string()));
            }
        }
        Ok(())
    }
}
