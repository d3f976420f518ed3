//! Built-in Lagos schedule.
//!
//! Plot sizes and land areas are in square metres; one large unit is a
//! hectare. All four survey zones share the same band edges and scale the
//! prime-zone fees (B at 70%, C at 50%, D at 35%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use landfee_core::{Currency, ZoneKey};

use crate::coordinates::CoordinatesPicking;
use crate::due_diligence::{ClientTables, DueDiligenceTariff};
use crate::schedule::{PlanFilingTariff, ServiceCharge, TariffSchedule};
use crate::survey::LayoutBand;
use crate::tier::TierTable;
use crate::zone::{Zone, ZoneRegistry};

const PLOT_BANDS: [(u64, u64); 12] = [
    (0, 300),
    (301, 600),
    (601, 1_000),
    (1_001, 2_000),
    (2_001, 5_000),
    (5_001, 10_000),
    (10_001, 20_000),
    (20_001, 50_000),
    (50_001, 100_000),
    (100_001, 200_000),
    (200_001, 350_000),
    (350_001, 500_000),
];

const ZONE_A_FEES: [u64; 12] = [
    1_050_000, 1_575_000, 2_100_000, 2_940_000, 4_200_000, 6_300_000, 9_450_000, 14_700_000,
    21_000_000, 31_500_000, 44_100_000, 57_750_000,
];
const ZONE_B_FEES: [u64; 12] = [
    735_000, 1_102_500, 1_470_000, 2_058_000, 2_940_000, 4_410_000, 6_615_000, 10_290_000,
    14_700_000, 22_050_000, 30_870_000, 40_425_000,
];
const ZONE_C_FEES: [u64; 12] = [
    525_000, 787_500, 1_050_000, 1_470_000, 2_100_000, 3_150_000, 4_725_000, 7_350_000,
    10_500_000, 15_750_000, 22_050_000, 28_875_000,
];
const ZONE_D_FEES: [u64; 12] = [
    367_500, 551_250, 735_000, 1_029_000, 1_470_000, 2_205_000, 3_307_500, 5_145_000,
    7_350_000, 11_025_000, 15_435_000, 20_212_500,
];

const SEARCH_BANDS: [(u64, u64); 5] = [
    (0, 1_000),
    (1_001, 5_000),
    (5_001, 10_000),
    (10_001, 50_000),
    (50_001, 500_000),
];

fn banded(bands: &[(u64, u64)], fees: &[u64]) -> TierTable {
    let rows: Vec<(u64, u64, u64)> = bands
        .iter()
        .zip(fees)
        .map(|(&(min, max), &fee)| (min, max, fee))
        .collect();
    TierTable::from_rows(&rows)
}

fn zone(key: &'static str, name: &str, areas: &[&str], fees: &[u64], extra_hectare: u64) -> Zone {
    Zone {
        key: ZoneKey::from_static(key),
        name: name.to_string(),
        areas: areas.iter().map(|a| a.to_string()).collect(),
        tiers: banded(&PLOT_BANDS, fees),
        additional_unit_fee: Decimal::from(extra_hectare),
    }
}

pub(crate) fn lagos() -> TariffSchedule {
    let zones = vec![
        zone(
            "A",
            "Zone A (Prime Island)",
            &[
                "Ikoyi",
                "Victoria Island",
                "Banana Island",
                "Eko Atlantic",
                "Oniru",
                "Lekki Phase 1",
                "Parkview Estate",
                "Lagos Island",
            ],
            &ZONE_A_FEES,
            1_050_000,
        ),
        zone(
            "B",
            "Zone B (Urban Mainland)",
            &[
                "Ikeja GRA",
                "Ikeja",
                "Surulere",
                "Yaba",
                "Maryland",
                "Gbagada",
                "Magodo",
                "Apapa",
                "Ajah",
                "Chevron",
            ],
            &ZONE_B_FEES,
            735_000,
        ),
        zone(
            "C",
            "Zone C (Suburban)",
            &[
                "Alimosho",
                "Agege",
                "Ifako-Ijaiye",
                "Kosofe",
                "Mushin",
                "Oshodi-Isolo",
                "Amuwo-Odofin",
                "Ojo",
                "Festac",
                "Ikotun",
            ],
            &ZONE_C_FEES,
            525_000,
        ),
        zone(
            "D",
            "Zone D (Peri-urban and Rural)",
            &[
                "Ibeju-Lekki",
                "Epe",
                "Badagry",
                "Ikorodu",
                "Ijede",
                "Imota",
                "Lekki Free Trade Zone",
                "Agbowa",
            ],
            &ZONE_D_FEES,
            367_500,
        ),
    ];

    TariffSchedule {
        currency: Currency::Ngn,
        tax_rate: dec!(0.13),
        residual_markup_rate: dec!(0.29),
        large_unit_area: dec!(10000),
        service_charge: ServiceCharge {
            area_step: dec!(600),
            fee_per_step: dec!(20000),
        },
        coordinates_picking: CoordinatesPicking {
            rate: dec!(0.094),
            rounding_step: dec!(10000),
        },
        plan_filing: PlanFilingTariff {
            markup_rate: dec!(0.29),
            flat_fee: dec!(10000),
        },
        details_rate: dec!(0.75),
        as_built_rate: dec!(1.20),
        layout_bands: vec![
            LayoutBand::up_to(10, dec!(0.80)),
            LayoutBand::up_to(20, dec!(0.75)),
            LayoutBand::up_to(40, dec!(0.70)),
            LayoutBand::up_to(60, dec!(0.65)),
            LayoutBand::up_to(80, dec!(0.60)),
            LayoutBand::up_to(100, dec!(0.55)),
            LayoutBand::rest(dec!(0.50)),
        ],
        zones: ZoneRegistry::from_zones_unchecked(zones),
        due_diligence: DueDiligenceTariff {
            land_information: ClientTables {
                individual: banded(&SEARCH_BANDS, &[50_000, 100_000, 150_000, 250_000, 400_000]),
                corporate: banded(&SEARCH_BANDS, &[100_000, 200_000, 300_000, 500_000, 800_000]),
            },
            charting_information: ClientTables {
                individual: banded(&SEARCH_BANDS, &[30_000, 60_000, 90_000, 150_000, 250_000]),
                corporate: banded(&SEARCH_BANDS, &[60_000, 120_000, 180_000, 300_000, 500_000]),
            },
            service_charge_rate: dec!(0.10),
            affiliate_rate: dec!(0.23),
        },
    }
}
