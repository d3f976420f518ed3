//! # Zone Registry
//!
//! Maps administrative areas to tariff zones. Each [`Zone`] owns its fee
//! schedule and the fee for every additional large unit (hectare) beyond
//! the schedule's last row.
//!
//! The registry is ordered: area resolution returns the *first* zone with
//! a matching area, so a broad query such as `"Lekki"` resolves to the
//! zone listed first. The registry holds any number of zones.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use landfee_core::money::ceil_units;
use landfee_core::{TariffError, ZoneKey};

use crate::tier::TierTable;

/// A tariff zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Registry key.
    pub key: ZoneKey,
    /// Display label.
    pub name: String,
    /// Administrative areas belonging to the zone, in display order.
    pub areas: Vec<String>,
    /// Plot-size fee schedule.
    pub tiers: TierTable,
    /// Fee per whole large unit beyond the schedule's last row.
    pub additional_unit_fee: Decimal,
}

impl Zone {
    /// Whether any area of this zone matches `query`.
    ///
    /// Matching is case-insensitive. A query matches an area it is a
    /// substring of (`"ikoyi"` matches `"Ikoyi"`), or an area it contains as
    /// whole words (`"Plot 4, Ikoyi, Lagos"` matches `"Ikoyi"`, but `"Ojodu"`
    /// does not match `"Ojo"`).
    pub fn matches_area(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        self.areas.iter().any(|area| {
            let area = area.to_lowercase();
            area.contains(&query) || contains_words(&query, &area)
        })
    }

    /// Whole large units by which `plot_size` exceeds the schedule, rounded up.
    ///
    /// Zero when the plot fits inside the schedule.
    pub fn overflow_units(
        &self,
        plot_size: Decimal,
        large_unit: Decimal,
    ) -> Result<Decimal, TariffError> {
        let excess = plot_size
            .checked_sub(self.tiers.max_covered())
            .ok_or(TariffError::AmountOutOfRange)?;
        if excess <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        ceil_units(excess, large_unit)
    }
}

/// Whether `needle` occurs in `haystack` bounded by non-alphanumeric
/// characters or the ends of the string.
fn contains_words(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Ordered collection of zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    /// Build a registry and validate it.
    pub fn new(zones: Vec<Zone>) -> Result<Self, TariffError> {
        let registry = Self { zones };
        registry.validate()?;
        Ok(registry)
    }

    pub(crate) fn from_zones_unchecked(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Zones in registry order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Look up a zone by key.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::UnknownZone`] if no zone has this key.
    pub fn get(&self, key: &ZoneKey) -> Result<&Zone, TariffError> {
        self.zones
            .iter()
            .find(|z| &z.key == key)
            .ok_or_else(|| TariffError::UnknownZone(key.to_string()))
    }

    /// Resolve an administrative-area name to the key of the first zone
    /// containing a matching area.
    pub fn resolve(&self, area: &str) -> Option<&ZoneKey> {
        let found = self.zones.iter().find(|z| z.matches_area(area));
        match found {
            Some(zone) => tracing::trace!(area, zone = %zone.key, "resolved area"),
            None => tracing::debug!(area, "area matches no zone"),
        }
        found.map(|z| &z.key)
    }

    /// Flat schedule fee for a plot in the given zone.
    pub fn tier_fee(&self, key: &ZoneKey, plot_size: Decimal) -> Result<Decimal, TariffError> {
        Ok(self.get(key)?.tiers.lookup(plot_size))
    }

    /// Check registry structure and every zone's schedule.
    pub fn validate(&self) -> Result<(), TariffError> {
        if self.zones.is_empty() {
            return Err(TariffError::InvalidSchedule("zone registry is empty".into()));
        }
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if zone.key.as_str().is_empty() {
                return Err(TariffError::InvalidSchedule("zone key is empty".into()));
            }
            if !seen.insert(&zone.key) {
                return Err(TariffError::InvalidSchedule(format!(
                    "duplicate zone key {}",
                    zone.key
                )));
            }
            if zone.areas.iter().any(|a| a.trim().is_empty()) {
                return Err(TariffError::InvalidSchedule(format!(
                    "zone {} lists an empty area name",
                    zone.key
                )));
            }
            if zone.additional_unit_fee < Decimal::ZERO {
                return Err(TariffError::InvalidSchedule(format!(
                    "zone {} has a negative additional unit fee",
                    zone.key
                )));
            }
            zone.tiers.validate(&format!("zone {}", zone.key))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn zone(key: &str, areas: &[&str]) -> Zone {
        Zone {
            key: ZoneKey::new(key).unwrap(),
            name: format!("Zone {key}"),
            areas: areas.iter().map(|a| a.to_string()).collect(),
            tiers: TierTable::from_rows(&[(0, 1000, 100), (1001, 500_000, 200)]),
            additional_unit_fee: dec!(50),
        }
    }

    fn registry() -> ZoneRegistry {
        ZoneRegistry::new(vec![
            zone("A", &["Lekki Phase 1", "Ikoyi"]),
            zone("B", &["Yaba"]),
            zone("D", &["Ibeju-Lekki", "Epe"]),
        ])
        .unwrap()
    }

    #[test]
    fn resolve_case_insensitive_substring() {
        let r = registry();
        assert_eq!(r.resolve("ikoyi").unwrap().as_str(), "A");
        assert_eq!(r.resolve("  YABA ").unwrap().as_str(), "B");
        assert_eq!(r.resolve("Plot 12, Epe, Lagos").unwrap().as_str(), "D");
    }

    #[test]
    fn resolve_first_zone_wins() {
        let r = registry();
        assert_eq!(r.resolve("Lekki").unwrap().as_str(), "A");
        assert_eq!(r.resolve("Ibeju-Lekki").unwrap().as_str(), "D");
    }

    #[test]
    fn address_must_contain_whole_area_name() {
        let r = ZoneRegistry::new(vec![
            zone("A", &["Lagos Island"]),
            zone("C", &["Ojo", "Festac"]),
        ])
        .unwrap();
        assert!(r.resolve("Ojodu").is_none());
        assert!(r.resolve("Ojodu Berger, Lagos").is_none());
        assert_eq!(r.resolve("14 Ojo Road").unwrap().as_str(), "C");
        assert_eq!(r.resolve("Festac-Ojo").unwrap().as_str(), "C");
        // A partial name still matches the areas it is part of.
        assert_eq!(r.resolve("Lagos").unwrap().as_str(), "A");
    }

    #[test]
    fn contains_words_needs_boundaries() {
        assert!(contains_words("plot 4, ikoyi, lagos", "ikoyi"));
        assert!(contains_words("ikoyi", "ikoyi"));
        assert!(!contains_words("ojodu", "ojo"));
        assert!(!contains_words("abojo", "ojo"));
        assert!(contains_words("ojodu, ojo", "ojo"));
    }

    #[test]
    fn resolve_unknown_or_empty_is_none() {
        let r = registry();
        assert!(r.resolve("Abuja").is_none());
        assert!(r.resolve("").is_none());
        assert!(r.resolve("   ").is_none());
    }

    #[test]
    fn get_unknown_zone_fails() {
        let r = registry();
        let err = r.get(&ZoneKey::new("C").unwrap()).unwrap_err();
        assert!(matches!(err, TariffError::UnknownZone(ref k) if k == "C"));
    }

    #[test]
    fn tier_fee_by_key() {
        let r = registry();
        let a = ZoneKey::new("a").unwrap();
        assert_eq!(r.tier_fee(&a, dec!(999)).unwrap(), dec!(100));
        assert_eq!(r.tier_fee(&a, dec!(600_000)).unwrap(), dec!(200));
    }

    #[test]
    fn overflow_units_round_up() {
        let z = zone("A", &["x"]);
        let ha = dec!(10000);
        assert_eq!(z.overflow_units(dec!(500000), ha).unwrap(), Decimal::ZERO);
        assert_eq!(z.overflow_units(dec!(510000), ha).unwrap(), dec!(1));
        assert_eq!(z.overflow_units(dec!(524000), ha).unwrap(), dec!(3));
        assert_eq!(z.overflow_units(dec!(500000.5), ha).unwrap(), dec!(1));
        assert!(z.overflow_units(Decimal::MIN, ha).is_err());
    }

    #[test]
    fn validate_rejects_duplicates_and_empty() {
        assert!(ZoneRegistry::new(vec![]).is_err());
        let err = ZoneRegistry::new(vec![zone("A", &["x"]), zone("a", &["y"])]).unwrap_err();
        assert!(err.to_string().contains("duplicate zone key A"));
        assert!(ZoneRegistry::new(vec![zone("A", &[" "])]).is_err());
    }

    #[test]
    fn validate_labels_bad_schedule_with_zone() {
        let mut bad = zone("C", &["x"]);
        bad.tiers = TierTable::from_rows(&[(0, 100, 10), (200, 300, 20)]);
        let err = ZoneRegistry::new(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("zone C"));
    }
}
