//! # Due-Diligence Fee Calculator
//!
//! Prices a due-diligence search on a parcel: a land-information search
//! and a charting-information search, each looked up in its own range
//! table keyed by client type. Both fees carry the same composite markup
//! (service charge plus affiliate charge), rounded to a whole unit per
//! line before summing, and the result is taxed like any survey.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use landfee_core::money::{checked_product, checked_sum, round_whole};
use landfee_core::{BillingBreakdown, BillingItem, BreakdownBuilder, TariffError};

use crate::schedule::TariffSchedule;
use crate::tier::TierTable;

/// Who is commissioning the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    /// A private person.
    Individual,
    /// A company or other organisation.
    Corporate,
}

impl ClientType {
    /// Returns the snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Corporate => "corporate",
        }
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "corporate" => Ok(Self::Corporate),
            other => Err(TariffError::invalid(
                "client_type",
                format!("unknown client type {other:?}"),
            )),
        }
    }
}

/// One range table per client type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTables {
    /// Table for individuals.
    pub individual: TierTable,
    /// Table for corporate clients.
    pub corporate: TierTable,
}

impl ClientTables {
    /// The table for `client`.
    pub fn for_client(&self, client: ClientType) -> &TierTable {
        match client {
            ClientType::Individual => &self.individual,
            ClientType::Corporate => &self.corporate,
        }
    }

    fn validate(&self, label: &str) -> Result<(), TariffError> {
        self.individual.validate(&format!("{label} (individual)"))?;
        self.corporate.validate(&format!("{label} (corporate)"))
    }
}

/// Due-diligence tables and markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDiligenceTariff {
    /// Land-information search fees by land area.
    pub land_information: ClientTables,
    /// Charting-information search fees by land area.
    pub charting_information: ClientTables,
    /// Service charge share added to each fee.
    pub service_charge_rate: Decimal,
    /// Affiliate charge share added to each fee.
    pub affiliate_rate: Decimal,
}

impl DueDiligenceTariff {
    /// `1 + service_charge_rate + affiliate_rate`.
    pub fn markup_multiplier(&self) -> Result<Decimal, TariffError> {
        checked_sum(
            checked_sum(Decimal::ONE, self.service_charge_rate)?,
            self.affiliate_rate,
        )
    }

    pub(crate) fn validate(&self) -> Result<(), TariffError> {
        if self.service_charge_rate < Decimal::ZERO || self.affiliate_rate < Decimal::ZERO {
            return Err(TariffError::InvalidSchedule(
                "due-diligence markup rates must not be negative".into(),
            ));
        }
        self.land_information.validate("land information")?;
        self.charting_information.validate("charting information")
    }
}

/// A due-diligence search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDiligenceRequest {
    /// Parcel area in area units; must be positive.
    pub land_area: Decimal,
    /// Who commissions the search.
    pub client_type: ClientType,
}

impl TariffSchedule {
    /// Price a due-diligence search.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::MissingParameter`] if `land_area` is not positive.
    pub fn calculate_due_diligence_fee(
        &self,
        request: &DueDiligenceRequest,
    ) -> Result<BillingBreakdown, TariffError> {
        if request.land_area <= Decimal::ZERO {
            return Err(TariffError::MissingParameter { field: "land_area" });
        }
        let tariff = &self.due_diligence;
        let client = request.client_type;
        let markup = tariff.markup_multiplier()?;

        let land = tariff
            .land_information
            .for_client(client)
            .lookup(request.land_area);
        let charting = tariff
            .charting_information
            .for_client(client)
            .lookup(request.land_area);

        let mut builder = BreakdownBuilder::new(self.currency);
        builder
            .line(BillingItem::flat(
                format!("Land information search ({client})"),
                round_whole(checked_product(land, markup)?),
            ))
            .line(BillingItem::flat(
                format!("Charting information search ({client})"),
                round_whole(checked_product(charting, markup)?),
            ));
        let breakdown = builder.finish(true, self.tax_rate)?;

        tracing::debug!(
            land_area = %request.land_area,
            client = %client,
            total = %breakdown.total,
            "priced due diligence"
        );
        Ok(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(area: Decimal, client: ClientType) -> DueDiligenceRequest {
        DueDiligenceRequest {
            land_area: area,
            client_type: client,
        }
    }

    #[test]
    fn markup_is_one_point_three_three() {
        let schedule = TariffSchedule::builtin();
        assert_eq!(schedule.due_diligence.markup_multiplier().unwrap(), dec!(1.33));
    }

    #[test]
    fn individual_small_parcel() {
        let schedule = TariffSchedule::builtin();
        let b = schedule
            .calculate_due_diligence_fee(&request(dec!(800), ClientType::Individual))
            .unwrap();
        // 50,000 * 1.33 and 30,000 * 1.33
        assert_eq!(b.items[0].amount, dec!(66500));
        assert_eq!(b.items[1].amount, dec!(39900));
        assert_eq!(b.subtotal, dec!(106400));
        assert_eq!(b.tax, dec!(13832));
        assert_eq!(b.total, dec!(120232));
        assert!(b.taxable);
        assert!(b.reconciles());
    }

    #[test]
    fn corporate_costs_more() {
        let schedule = TariffSchedule::builtin();
        let ind = schedule
            .calculate_due_diligence_fee(&request(dec!(6000), ClientType::Individual))
            .unwrap();
        let corp = schedule
            .calculate_due_diligence_fee(&request(dec!(6000), ClientType::Corporate))
            .unwrap();
        assert!(corp.total > ind.total);
        // 300,000 * 1.33 and 180,000 * 1.33
        assert_eq!(corp.items[0].amount, dec!(399000));
        assert_eq!(corp.items[1].amount, dec!(239400));
    }

    #[test]
    fn each_line_rounded_independently() {
        let mut schedule = TariffSchedule::builtin().clone();
        schedule.due_diligence.land_information.individual =
            TierTable::from_rows(&[(0, 500_000, 13)]);
        schedule.due_diligence.charting_information.individual =
            TierTable::from_rows(&[(0, 500_000, 13)]);
        let b = schedule
            .calculate_due_diligence_fee(&request(dec!(10), ClientType::Individual))
            .unwrap();
        // 13 * 1.33 = 17.29 -> 17 per line; rounding the sum would give 35.
        assert_eq!(b.items[0].amount, dec!(17));
        assert_eq!(b.items[1].amount, dec!(17));
        assert_eq!(b.subtotal, dec!(34));
    }

    #[test]
    fn oversized_parcel_uses_top_band() {
        let schedule = TariffSchedule::builtin();
        let b = schedule
            .calculate_due_diligence_fee(&request(dec!(2000000), ClientType::Individual))
            .unwrap();
        // 400,000 * 1.33
        assert_eq!(b.items[0].amount, dec!(532000));
    }

    #[test]
    fn non_positive_area_is_missing() {
        let schedule = TariffSchedule::builtin();
        for area in [Decimal::ZERO, dec!(-5)] {
            let err = schedule
                .calculate_due_diligence_fee(&request(area, ClientType::Corporate))
                .unwrap_err();
            assert!(matches!(
                err,
                TariffError::MissingParameter { field: "land_area" }
            ));
        }
    }

    #[test]
    fn client_type_parse() {
        assert_eq!(
            "Corporate".parse::<ClientType>().unwrap(),
            ClientType::Corporate
        );
        assert!("government".parse::<ClientType>().is_err());
    }
}
