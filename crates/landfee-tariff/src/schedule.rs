//! # Tariff Schedule
//!
//! Every constant the calculators use lives in one [`TariffSchedule`]:
//! rates, flat fees, layout plot-count bands, the zone registry and the
//! due-diligence tables. Nothing is hard-coded in the calculators.
//!
//! ## Sources
//!
//! - [`TariffSchedule::builtin()`] — the published Lagos schedule, built
//!   once per process and shared read-only by every caller.
//! - [`TariffSchedule::from_yaml_str()`] / [`TariffSchedule::load()`] — an
//!   operator-supplied schedule, fully validated before use.
//!
//! A schedule is never mutated after construction; callers that need a
//! variant clone it.

use std::path::Path;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use landfee_core::{Currency, TariffError};

use crate::coordinates::CoordinatesPicking;
use crate::due_diligence::DueDiligenceTariff;
use crate::survey::LayoutBand;
use crate::zone::ZoneRegistry;

/// Back-office service charge, billed per started area step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCharge {
    /// Area covered by one charge step.
    pub area_step: Decimal,
    /// Fee per started step.
    pub fee_per_step: Decimal,
}

/// Plan-filing pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFilingTariff {
    /// Markup on the survey fee for fresh-survey and existing-coordinates filings.
    pub markup_rate: Decimal,
    /// Flat fee for direct-verification and retaking-points filings.
    pub flat_fee: Decimal,
}

/// The complete set of tariff data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffSchedule {
    /// Currency of every amount in the schedule.
    pub currency: Currency,
    /// Tax applied to the subtotal of taxable breakdowns.
    pub tax_rate: Decimal,
    /// Markup on the zone base fee for requests without a waiving sub-kind.
    pub residual_markup_rate: Decimal,
    /// Area of one large unit (hectare) used for overflow extrapolation.
    pub large_unit_area: Decimal,
    /// Service charge for every survey kind except plan filing.
    pub service_charge: ServiceCharge,
    /// Coordinates-picking fee parameters.
    pub coordinates_picking: CoordinatesPicking,
    /// Plan-filing pricing.
    pub plan_filing: PlanFilingTariff,
    /// Share of the survey fee charged for a detail survey.
    pub details_rate: Decimal,
    /// Share of the survey fee charged for an as-built survey.
    pub as_built_rate: Decimal,
    /// Layout survey share by plot count, most plots last.
    pub layout_bands: Vec<LayoutBand>,
    /// Tariff zones in resolution order.
    pub zones: ZoneRegistry,
    /// Due-diligence search tables.
    pub due_diligence: DueDiligenceTariff,
}

static BUILTIN: OnceLock<TariffSchedule> = OnceLock::new();

impl TariffSchedule {
    /// The built-in schedule, constructed on first use and shared afterwards.
    pub fn builtin() -> &'static TariffSchedule {
        BUILTIN.get_or_init(crate::defaults::lagos)
    }

    /// Parse and validate a YAML schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::Serialization`] for malformed YAML and
    /// [`TariffError::InvalidRange`] / [`TariffError::InvalidSchedule`] for
    /// structurally invalid data.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TariffError> {
        let schedule: Self =
            serde_yaml::from_str(yaml).map_err(|e| TariffError::Serialization(e.to_string()))?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Read, parse and validate a YAML schedule file.
    pub fn load(path: &Path) -> Result<Self, TariffError> {
        let yaml = std::fs::read_to_string(path)?;
        let schedule = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            zones = schedule.zones.zones().len(),
            "loaded tariff schedule"
        );
        Ok(schedule)
    }

    /// Render the schedule as YAML.
    pub fn to_yaml(&self) -> Result<String, TariffError> {
        serde_yaml::to_string(self).map_err(|e| TariffError::Serialization(e.to_string()))
    }

    /// Check every schedule rule.
    pub fn validate(&self) -> Result<(), TariffError> {
        check_non_negative("tax_rate", self.tax_rate, Some(Decimal::ONE))?;
        check_non_negative("residual_markup_rate", self.residual_markup_rate, None)?;
        check_non_negative("plan_filing.markup_rate", self.plan_filing.markup_rate, None)?;
        check_non_negative("plan_filing.flat_fee", self.plan_filing.flat_fee, None)?;
        check_non_negative("details_rate", self.details_rate, None)?;
        check_non_negative("as_built_rate", self.as_built_rate, None)?;
        check_non_negative(
            "service_charge.fee_per_step",
            self.service_charge.fee_per_step,
            None,
        )?;
        if self.large_unit_area <= Decimal::ZERO {
            return Err(TariffError::InvalidSchedule(
                "large_unit_area must be positive".into(),
            ));
        }
        if self.service_charge.area_step <= Decimal::ZERO {
            return Err(TariffError::InvalidSchedule(
                "service_charge.area_step must be positive".into(),
            ));
        }
        self.coordinates_picking.validate()?;
        crate::survey::validate_layout_bands(&self.layout_bands)?;
        self.zones.validate()?;
        self.due_diligence.validate()
    }
}

fn check_non_negative(
    field: &str,
    value: Decimal,
    max: Option<Decimal>,
) -> Result<(), TariffError> {
    if value < Decimal::ZERO {
        return Err(TariffError::InvalidSchedule(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    if let Some(max) = max {
        if value > max {
            return Err(TariffError::InvalidSchedule(format!(
                "{field} must not exceed {max}, got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn builtin_schedule_is_valid() {
        TariffSchedule::builtin().validate().unwrap();
    }

    #[test]
    fn builtin_is_shared() {
        let a = TariffSchedule::builtin() as *const TariffSchedule;
        let b = TariffSchedule::builtin() as *const TariffSchedule;
        assert_eq!(a, b);
    }

    #[test]
    fn builtin_constants() {
        let s = TariffSchedule::builtin();
        assert_eq!(s.currency, Currency::Ngn);
        assert_eq!(s.tax_rate, dec!(0.13));
        assert_eq!(s.residual_markup_rate, dec!(0.29));
        assert_eq!(s.large_unit_area, dec!(10000));
        assert_eq!(s.service_charge.area_step, dec!(600));
        assert_eq!(s.service_charge.fee_per_step, dec!(20000));
        assert_eq!(s.plan_filing.flat_fee, dec!(10000));
        assert_eq!(s.zones.zones().len(), 4);
    }

    #[test]
    fn yaml_dump_reloads_identically() {
        let s = TariffSchedule::builtin();
        let yaml = s.to_yaml().unwrap();
        let reloaded = TariffSchedule::from_yaml_str(&yaml).unwrap();
        assert_eq!(&reloaded, s);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.yaml");
        std::fs::write(&path, TariffSchedule::builtin().to_yaml().unwrap()).unwrap();
        let loaded = TariffSchedule::load(&path).unwrap();
        assert_eq!(loaded.zones.zones().len(), 4);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = TariffSchedule::load(Path::new("/nonexistent/schedule.yaml")).unwrap_err();
        assert!(matches!(err, TariffError::Io(_)));
    }

    #[test]
    fn malformed_yaml_is_serialization_error() {
        let err = TariffSchedule::from_yaml_str("currency: [").unwrap_err();
        assert!(matches!(err, TariffError::Serialization(_)));
    }

    #[test]
    fn invalid_tier_table_rejected_on_load() {
        let mut s = TariffSchedule::builtin().clone();
        let mut zones = s.zones.zones().to_vec();
        zones[1].tiers = crate::tier::TierTable::from_rows(&[(0, 300, 10), (400, 600, 20)]);
        s.zones = ZoneRegistry::from_zones_unchecked(zones);
        let yaml = s.to_yaml().unwrap();
        let err = TariffSchedule::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, TariffError::InvalidRange { ref table, .. } if table == "zone B"));
    }

    #[test]
    fn rate_rules() {
        let mut s = TariffSchedule::builtin().clone();
        s.tax_rate = dec!(1.5);
        assert!(matches!(s.validate(), Err(TariffError::InvalidSchedule(_))));

        let mut s = TariffSchedule::builtin().clone();
        s.residual_markup_rate = dec!(-0.01);
        assert!(s.validate().is_err());

        let mut s = TariffSchedule::builtin().clone();
        s.large_unit_area = Decimal::ZERO;
        assert!(s.validate().is_err());

        let mut s = TariffSchedule::builtin().clone();
        s.service_charge.area_step = Decimal::ZERO;
        assert!(s.validate().is_err());
    }
}
