//! # Billing Breakdowns
//!
//! The itemized output of every calculator: customer-facing line items,
//! internal adjustments, subtotal, tax and total.
//!
//! ## Invariants
//!
//! - `total == subtotal + tax`.
//! - `subtotal == Σ charge items + Σ adjustments`. Component items describe
//!   part of a later charge (extra hectares, title multiplier) and do not
//!   count towards the subtotal on their own.
//! - `amount == quantity * unit_price` whenever both are present.
//! - An exempt breakdown (`taxable == false`) has `tax == 0`.
//!
//! [`BreakdownBuilder`] is the only path the calculators use, so these hold
//! by construction; [`BillingBreakdown::reconciles()`] re-checks them for
//! breakdowns that arrive from elsewhere (e.g. deserialized from storage).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::canonical::{quote_digest, CanonicalBytes, QuoteDigest};
use crate::currency::Currency;
use crate::error::TariffError;
use crate::money::{checked_product, checked_sum, rate_of};

/// Role of a line item in the breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Contributes its amount to the subtotal.
    Charge,
    /// Itemizes part of a later charge; informational.
    Component,
}

/// One line of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingItem {
    /// Customer-facing label.
    pub description: String,
    /// Line amount.
    pub amount: Decimal,
    /// Number of units, for priced lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    /// Price per unit, for priced lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    /// Whether the line counts towards the subtotal.
    pub kind: LineKind,
}

impl BillingItem {
    /// A flat charge line.
    pub fn flat(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount,
            quantity: None,
            unit_price: None,
            kind: LineKind::Charge,
        }
    }

    /// A charge line priced per unit; the amount is derived.
    ///
    /// # Errors
    ///
    /// [`TariffError::AmountOutOfRange`] if `quantity * unit_price` overflows.
    pub fn priced(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<Self, TariffError> {
        Ok(Self {
            description: description.into(),
            amount: checked_product(quantity, unit_price)?,
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            kind: LineKind::Charge,
        })
    }

    /// Mark this line as a component of a later charge.
    pub fn as_component(mut self) -> Self {
        self.kind = LineKind::Component;
        self
    }

    /// True unless quantity and unit price are both present and disagree
    /// with the amount.
    pub fn is_consistent(&self) -> bool {
        match (self.quantity, self.unit_price) {
            (Some(q), Some(p)) => q.checked_mul(p) == Some(self.amount),
            _ => true,
        }
    }
}

/// Kind of a charge that is part of the subtotal without a customer-facing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Back-office service charge billed per started area step.
    ServiceCharge,
    /// Residual markup on the zone base fee.
    ResidualMarkup,
}

/// An internal charge folded into the subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// What the adjustment is.
    pub kind: AdjustmentKind,
    /// Internal label.
    pub description: String,
    /// Amount added to the subtotal.
    pub amount: Decimal,
}

/// Itemized result of a fee calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingBreakdown {
    /// Customer-facing lines, in calculation order.
    pub items: Vec<BillingItem>,
    /// Charges in the subtotal without a customer-facing line.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
    /// Sum of charge items and adjustments.
    pub subtotal: Decimal,
    /// Tax on the subtotal; zero for exempt breakdowns.
    pub tax: Decimal,
    /// `subtotal + tax`.
    pub total: Decimal,
    /// Currency all amounts are denominated in.
    pub currency: Currency,
    /// Whether tax was applied to this kind of service.
    pub taxable: bool,
}

impl BillingBreakdown {
    /// Sum of the charge lines; `None` if the sum overflows.
    pub fn charges_total(&self) -> Option<Decimal> {
        checked_total(
            self.items
                .iter()
                .filter(|item| item.kind == LineKind::Charge)
                .map(|item| item.amount),
        )
    }

    /// Sum of the internal adjustments; `None` if the sum overflows.
    pub fn adjustments_total(&self) -> Option<Decimal> {
        checked_total(self.adjustments.iter().map(|adj| adj.amount))
    }

    /// Amount of the first adjustment of the given kind, if any.
    pub fn adjustment(&self, kind: AdjustmentKind) -> Option<Decimal> {
        self.adjustments
            .iter()
            .find(|adj| adj.kind == kind)
            .map(|adj| adj.amount)
    }

    /// Check every breakdown invariant.
    pub fn reconciles(&self) -> bool {
        let listed = self
            .charges_total()
            .zip(self.adjustments_total())
            .and_then(|(charges, adjustments)| charges.checked_add(adjustments));
        self.subtotal.checked_add(self.tax) == Some(self.total)
            && listed == Some(self.subtotal)
            && self.items.iter().all(BillingItem::is_consistent)
            && (self.taxable || self.tax.is_zero())
    }

    /// Canonical bytes of this breakdown.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, TariffError> {
        Ok(CanonicalBytes::new(self)?)
    }

    /// Content digest of this breakdown.
    pub fn digest(&self) -> Result<QuoteDigest, TariffError> {
        Ok(quote_digest(&self.canonical_bytes()?))
    }
}

fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount))
}

/// Accumulates lines and the running subtotal of a breakdown.
///
/// An overflowing subtotal is remembered and reported by [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct BreakdownBuilder {
    currency: Currency,
    items: Vec<BillingItem>,
    adjustments: Vec<Adjustment>,
    subtotal: Option<Decimal>,
}

impl BreakdownBuilder {
    /// Start an empty breakdown.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
            adjustments: Vec::new(),
            subtotal: Some(Decimal::ZERO),
        }
    }

    /// Append a line. Charge lines add to the subtotal; component lines do not.
    pub fn line(&mut self, item: BillingItem) -> &mut Self {
        if item.kind == LineKind::Charge {
            self.add(item.amount);
        }
        self.items.push(item);
        self
    }

    /// Add an internal charge to the subtotal.
    pub fn adjust(
        &mut self,
        kind: AdjustmentKind,
        description: impl Into<String>,
        amount: Decimal,
    ) -> &mut Self {
        self.add(amount);
        self.adjustments.push(Adjustment {
            kind,
            description: description.into(),
            amount,
        });
        self
    }

    fn add(&mut self, amount: Decimal) {
        self.subtotal = self.subtotal.and_then(|sum| sum.checked_add(amount));
    }

    /// Running subtotal; `None` once it has overflowed.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.subtotal
    }

    /// Close the breakdown. Taxable breakdowns get `round(subtotal * tax_rate)`.
    ///
    /// # Errors
    ///
    /// [`TariffError::AmountOutOfRange`] if the subtotal, tax or total overflows.
    pub fn finish(
        self,
        taxable: bool,
        tax_rate: Decimal,
    ) -> Result<BillingBreakdown, TariffError> {
        let subtotal = self.subtotal.ok_or(TariffError::AmountOutOfRange)?;
        let tax = if taxable {
            rate_of(subtotal, tax_rate)?
        } else {
            Decimal::ZERO
        };
        Ok(BillingBreakdown {
            items: self.items,
            adjustments: self.adjustments,
            subtotal,
            tax,
            total: checked_sum(subtotal, tax)?,
            currency: self.currency,
            taxable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(taxable: bool) -> BillingBreakdown {
        let mut b = BreakdownBuilder::new(Currency::Ngn);
        b.line(
            BillingItem::priced("Extra hectares", dec!(2), dec!(1000))
                .unwrap()
                .as_component(),
        )
            .line(BillingItem::flat("Survey fee", dec!(1575000)))
            .adjust(AdjustmentKind::ServiceCharge, "Service charge", dec!(20000))
            .adjust(AdjustmentKind::ResidualMarkup, "Residual markup", dec!(456750));
        b.finish(taxable, dec!(0.13)).unwrap()
    }

    #[test]
    fn taxable_breakdown_totals() {
        let b = sample(true);
        assert_eq!(b.subtotal, dec!(2051750));
        assert_eq!(b.tax, dec!(266728));
        assert_eq!(b.total, dec!(2318478));
        assert!(b.reconciles());
    }

    #[test]
    fn exempt_breakdown_has_no_tax() {
        let b = sample(false);
        assert_eq!(b.tax, Decimal::ZERO);
        assert_eq!(b.total, b.subtotal);
        assert!(!b.taxable);
        assert!(b.reconciles());
    }

    #[test]
    fn components_do_not_count() {
        let b = sample(true);
        assert_eq!(b.charges_total(), Some(dec!(1575000)));
        assert_eq!(b.adjustments_total(), Some(dec!(476750)));
        assert_eq!(b.items[0].kind, LineKind::Component);
    }

    #[test]
    fn adjustment_lookup_by_kind() {
        let b = sample(true);
        assert_eq!(b.adjustment(AdjustmentKind::ServiceCharge), Some(dec!(20000)));
        assert_eq!(b.adjustment(AdjustmentKind::ResidualMarkup), Some(dec!(456750)));
    }

    #[test]
    fn priced_item_is_consistent() {
        let item = BillingItem::priced("Units", dec!(4), dec!(250)).unwrap();
        assert_eq!(item.amount, dec!(1000));
        assert!(item.is_consistent());

        let mut broken = item.clone();
        broken.amount = dec!(999);
        assert!(!broken.is_consistent());
    }

    #[test]
    fn priced_item_overflow_is_an_error() {
        let err = BillingItem::priced("Units", Decimal::MAX, dec!(2)).unwrap_err();
        assert!(matches!(err, TariffError::AmountOutOfRange));
    }

    #[test]
    fn overflowing_subtotal_fails_to_finish() {
        let mut b = BreakdownBuilder::new(Currency::Ngn);
        b.line(BillingItem::flat("Survey fee", Decimal::MAX))
            .adjust(AdjustmentKind::ResidualMarkup, "Residual markup", dec!(1));
        assert_eq!(b.subtotal(), None);
        assert!(matches!(
            b.finish(false, dec!(0.13)),
            Err(TariffError::AmountOutOfRange)
        ));
    }

    #[test]
    fn overflowing_total_fails_to_finish() {
        let mut b = BreakdownBuilder::new(Currency::Ngn);
        b.line(BillingItem::flat("Survey fee", Decimal::MAX));
        assert!(b.finish(true, dec!(0.13)).is_err());
    }

    #[test]
    fn oversized_stored_breakdown_does_not_reconcile() {
        let mut b = sample(true);
        b.items[1].amount = Decimal::MAX;
        b.adjustments[0].amount = Decimal::MAX;
        assert_eq!(b.adjustments_total(), None);
        assert!(!b.reconciles());
    }

    #[test]
    fn tampered_breakdown_does_not_reconcile() {
        let mut b = sample(true);
        b.total += dec!(1);
        assert!(!b.reconciles());

        let mut b = sample(false);
        b.tax = dec!(5);
        b.total = b.subtotal + b.tax;
        assert!(!b.reconciles());
    }

    #[test]
    fn digest_is_deterministic() {
        let a = sample(true).digest().unwrap();
        let b = sample(true).digest().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, sample(false).digest().unwrap());
    }

    #[test]
    fn serde_shape_uses_string_amounts() {
        let json = serde_json::to_value(sample(true)).unwrap();
        assert_eq!(json["total"], "2318478");
        assert_eq!(json["currency"], "NGN");
        assert_eq!(json["items"][1]["kind"], "charge");
        assert!(json["items"][1].get("quantity").is_none());
        assert_eq!(json["adjustments"][0]["kind"], "service_charge");
    }
}
