//! # Ordered Range Tables
//!
//! A [`TierTable`] maps a size (plot area, land area) to a flat fee using a
//! government-published schedule of contiguous ranges. Real schedules are
//! irregular, so they are kept as data and scanned linearly; tables hold a
//! handful of rows.
//!
//! ## Row Rules
//!
//! Rows are whole-unit inclusive ranges `{min, max, fee}`:
//!
//! ```text
//!   0 ─ 300 │ 301 ─ 600 │ 601 ─ 1000 │ ... │ 350001 ─ 500000
//! ```
//!
//! - The first row starts at 0; each next row starts at `prev.max + 1`.
//! - `min <= max`, bounds are whole numbers, fees are non-negative and
//!   non-decreasing down the table.
//!
//! A size matches the first row whose `max` is at least the size, so a
//! fractional size between two rows (300.5) belongs to the upper row and
//! every size in `[0, max_covered]` matches exactly one row. Sizes beyond
//! the last row are charged the last row's fee; extrapolation past the
//! table is the caller's concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use landfee_core::TariffError;

/// One row of a range table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    /// Smallest size in the row (inclusive).
    pub min: Decimal,
    /// Largest size in the row (inclusive).
    pub max: Decimal,
    /// Flat fee for any size in the row.
    pub fee: Decimal,
}

impl FeeTier {
    /// Whether `size` lies inside this row's inclusive bounds.
    pub fn contains(&self, size: Decimal) -> bool {
        self.min <= size && size <= self.max
    }
}

/// An ordered, contiguous list of [`FeeTier`]s.
///
/// Deserialization does not validate; schedules validate every table with
/// a label through [`TierTable::validate()`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<FeeTier>,
}

impl TierTable {
    /// Build a table and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::InvalidRange`] naming `label` if any row rule
    /// is violated.
    pub fn new(label: &str, tiers: Vec<FeeTier>) -> Result<Self, TariffError> {
        let table = Self { tiers };
        table.validate(label)?;
        Ok(table)
    }

    /// Build a table from `(min, max, fee)` rows of reference data.
    pub(crate) fn from_rows(rows: &[(u64, u64, u64)]) -> Self {
        Self {
            tiers: rows
                .iter()
                .map(|&(min, max, fee)| FeeTier {
                    min: Decimal::from(min),
                    max: Decimal::from(max),
                    fee: Decimal::from(fee),
                })
                .collect(),
        }
    }

    /// Rows in ascending order.
    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    /// Upper bound of the last row, or zero for an empty table.
    pub fn max_covered(&self) -> Decimal {
        self.tiers.last().map_or(Decimal::ZERO, |t| t.max)
    }

    /// The row `size` falls in, or `None` beyond the last row.
    pub fn tier_for(&self, size: Decimal) -> Option<&FeeTier> {
        self.tiers.iter().find(|t| size <= t.max)
    }

    /// Flat fee for `size`. Beyond the last row the last row's fee applies.
    pub fn lookup(&self, size: Decimal) -> Decimal {
        self.tier_for(size)
            .or_else(|| self.tiers.last())
            .map_or(Decimal::ZERO, |t| t.fee)
    }

    /// Check every row rule.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::InvalidRange`] for the first violated rule.
    pub fn validate(&self, label: &str) -> Result<(), TariffError> {
        let first = self
            .tiers
            .first()
            .ok_or_else(|| TariffError::invalid_range(label, "table has no rows"))?;
        if !first.min.is_zero() {
            return Err(TariffError::invalid_range(
                label,
                format!("first row must start at 0, starts at {}", first.min),
            ));
        }

        for (i, tier) in self.tiers.iter().enumerate() {
            if !tier.min.fract().is_zero() || !tier.max.fract().is_zero() {
                return Err(TariffError::invalid_range(
                    label,
                    format!("row {i} bounds must be whole units"),
                ));
            }
            if tier.min > tier.max {
                return Err(TariffError::invalid_range(
                    label,
                    format!("row {i} is inverted: {} > {}", tier.min, tier.max),
                ));
            }
            if tier.fee.is_sign_negative() && !tier.fee.is_zero() {
                return Err(TariffError::invalid_range(
                    label,
                    format!("row {i} has a negative fee"),
                ));
            }
        }

        for (i, pair) in self.tiers.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let Some(expected) = prev.max.checked_add(Decimal::ONE) else {
                return Err(TariffError::invalid_range(
                    label,
                    format!("rows {i} and {} overlap", i + 1),
                ));
            };
            if next.min > expected {
                return Err(TariffError::invalid_range(
                    label,
                    format!("gap between rows {i} and {}", i + 1),
                ));
            }
            if next.min < expected {
                return Err(TariffError::invalid_range(
                    label,
                    format!("rows {i} and {} overlap", i + 1),
                ));
            }
            if next.fee < prev.fee {
                return Err(TariffError::invalid_range(
                    label,
                    format!("fee decreases from row {i} to row {}", i + 1),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tier(min: u64, max: u64, fee: u64) -> FeeTier {
        FeeTier {
            min: Decimal::from(min),
            max: Decimal::from(max),
            fee: Decimal::from(fee),
        }
    }

    fn small_table() -> TierTable {
        TierTable::new(
            "test",
            vec![tier(0, 300, 100), tier(301, 600, 150), tier(601, 1000, 150)],
        )
        .unwrap()
    }

    #[test]
    fn lookup_inside_rows() {
        let t = small_table();
        assert_eq!(t.lookup(dec!(0)), dec!(100));
        assert_eq!(t.lookup(dec!(300)), dec!(100));
        assert_eq!(t.lookup(dec!(301)), dec!(150));
        assert_eq!(t.lookup(dec!(1000)), dec!(150));
    }

    #[test]
    fn fractional_size_between_rows_goes_up() {
        let t = small_table();
        assert_eq!(t.tier_for(dec!(300.5)).unwrap().min, dec!(301));
    }

    #[test]
    fn beyond_last_row_uses_last_fee() {
        let t = small_table();
        assert!(t.tier_for(dec!(1000.01)).is_none());
        assert_eq!(t.lookup(dec!(5000)), dec!(150));
        assert_eq!(t.max_covered(), dec!(1000));
    }

    #[test]
    fn rejects_empty() {
        let err = TierTable::new("empty", vec![]).unwrap_err();
        assert!(matches!(err, TariffError::InvalidRange { .. }));
        assert_eq!(TierTable::from_rows(&[]).lookup(dec!(10)), Decimal::ZERO);
    }

    #[test]
    fn rejects_nonzero_start() {
        assert!(TierTable::new("t", vec![tier(1, 300, 100)]).is_err());
    }

    #[test]
    fn rejects_gap() {
        let err = TierTable::new("t", vec![tier(0, 300, 100), tier(302, 600, 150)]).unwrap_err();
        assert!(err.to_string().contains("gap between rows 0 and 1"));
    }

    #[test]
    fn rejects_overlap() {
        let err = TierTable::new("t", vec![tier(0, 300, 100), tier(300, 600, 150)]).unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn rejects_inverted_row() {
        assert!(TierTable::new("t", vec![tier(0, 300, 100), tier(301, 200, 150)]).is_err());
    }

    #[test]
    fn rejects_row_after_largest_bound() {
        let rows = vec![
            FeeTier {
                min: dec!(0),
                max: Decimal::MAX,
                fee: dec!(1),
            },
            FeeTier {
                min: Decimal::MAX,
                max: Decimal::MAX,
                fee: dec!(2),
            },
        ];
        let err = TierTable::new("t", rows).unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn rejects_decreasing_fee() {
        let err = TierTable::new("t", vec![tier(0, 300, 200), tier(301, 600, 150)]).unwrap_err();
        assert!(err.to_string().contains("fee decreases"));
    }

    #[test]
    fn rejects_fractional_bounds() {
        let rows = vec![FeeTier {
            min: dec!(0),
            max: dec!(300.5),
            fee: dec!(1),
        }];
        assert!(TierTable::new("t", rows).is_err());
    }

    #[test]
    fn rejects_negative_fee() {
        let rows = vec![FeeTier {
            min: dec!(0),
            max: dec!(300),
            fee: dec!(-1),
        }];
        assert!(TierTable::new("t", rows).is_err());
    }

    #[test]
    fn serializes_as_plain_list() {
        let t = small_table();
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["min"], "301");
        let back: TierTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::due_diligence::ClientType;
    use crate::schedule::TariffSchedule;
    use proptest::prelude::*;

    /// Every range table of the built-in schedule.
    fn builtin_tables() -> Vec<&'static TierTable> {
        let s = TariffSchedule::builtin();
        let mut tables: Vec<&'static TierTable> =
            s.zones.zones().iter().map(|zone| &zone.tiers).collect();
        for client in [ClientType::Individual, ClientType::Corporate] {
            tables.push(s.due_diligence.land_information.for_client(client));
            tables.push(s.due_diligence.charting_information.for_client(client));
        }
        tables
    }

    /// `share` millionths of the table's covered range.
    fn scaled(table: &TierTable, share: u32) -> Decimal {
        table.max_covered() * Decimal::new(i64::from(share), 6)
    }

    proptest! {
        /// Every size up to the last row falls in exactly one row, the one
        /// `tier_for` returns.
        #[test]
        fn covered_sizes_match_one_row(index in 0usize..64, share in 0u32..=1_000_000) {
            let tables = builtin_tables();
            let table = tables[index % tables.len()];
            let size = scaled(table, share);

            let found = table.tier_for(size);
            prop_assert!(found.is_some(), "no row for {}", size);
            let whole = size.ceil();
            let matching: Vec<_> = table.tiers().iter().filter(|t| t.contains(whole)).collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(matching[0], found.unwrap());
            prop_assert_eq!(table.lookup(size), matching[0].fee);
        }

        /// A larger size never costs less, inside or beyond the table.
        #[test]
        fn fee_is_monotonic(
            index in 0usize..64,
            a in 0u32..=2_000_000,
            b in 0u32..=2_000_000,
        ) {
            let tables = builtin_tables();
            let table = tables[index % tables.len()];
            let (small, large) = (scaled(table, a.min(b)), scaled(table, a.max(b)));
            prop_assert!(table.lookup(small) <= table.lookup(large));
        }
    }
}
