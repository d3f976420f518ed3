//! # Currency Display
//!
//! Display-only formatting for breakdown amounts. No business logic lives
//! here: amounts are rounded to minor units for display only, never for
//! arithmetic.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::TariffError;
use crate::money::{round_minor, MINOR_UNIT_PLACES};

/// Currencies a breakdown can be denominated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nigerian naira.
    #[default]
    Ngn,
    /// US dollar.
    Usd,
    /// Pound sterling.
    Gbp,
    /// Euro.
    Eur,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Eur => "EUR",
        }
    }

    /// Display symbol, written before the amount.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Ngn => "\u{20a6}",
            Self::Usd => "$",
            Self::Gbp => "\u{a3}",
            Self::Eur => "\u{20ac}",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NGN" => Ok(Self::Ngn),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            "EUR" => Ok(Self::Eur),
            other => Err(TariffError::invalid(
                "currency",
                format!("unsupported currency code {other:?}"),
            )),
        }
    }
}

/// Format an amount for display: symbol, comma-grouped thousands, two
/// decimal places, leading `-` for negative amounts.
///
/// ```
/// use landfee_core::{format_currency, Currency};
/// use landfee_core::Decimal;
///
/// assert_eq!(format_currency(Decimal::from(2318478), Currency::Ngn), "\u{20a6}2,318,478.00");
/// ```
pub fn format_currency(amount: Decimal, currency: Currency) -> String {
    let rounded = round_minor(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let mut magnitude = rounded.abs();
    magnitude.rescale(MINOR_UNIT_PLACES);
    let digits = magnitude.to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!(
        "{sign}{}{}.{fraction}",
        currency.symbol(),
        group_thousands(whole)
    )
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_naira_with_grouping() {
        assert_eq!(format_currency(dec!(2318478), Currency::Ngn), "\u{20a6}2,318,478.00");
        assert_eq!(format_currency(dec!(1000), Currency::Ngn), "\u{20a6}1,000.00");
        assert_eq!(format_currency(dec!(999), Currency::Ngn), "\u{20a6}999.00");
    }

    #[test]
    fn formats_fractions_to_minor_units() {
        assert_eq!(format_currency(dec!(15750.5), Currency::Usd), "$15,750.50");
        assert_eq!(format_currency(dec!(0.125), Currency::Gbp), "\u{a3}0.13");
    }

    #[test]
    fn formats_negative_and_zero() {
        assert_eq!(format_currency(dec!(-1234567.891), Currency::Eur), "-\u{20ac}1,234,567.89");
        assert_eq!(format_currency(Decimal::ZERO, Currency::Ngn), "\u{20a6}0.00");
        assert_eq!(format_currency(dec!(-0.001), Currency::Ngn), "\u{20a6}0.00");
    }

    #[test]
    fn currency_parse_is_case_insensitive() {
        assert_eq!("ngn".parse::<Currency>().unwrap(), Currency::Ngn);
        assert_eq!(" USD ".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("XOF".parse::<Currency>().is_err());
    }

    #[test]
    fn currency_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Currency::Ngn).unwrap(), "\"NGN\"");
        let c: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(c, Currency::Eur);
    }

    #[test]
    fn default_currency_is_naira() {
        assert_eq!(Currency::default(), Currency::Ngn);
    }
}
