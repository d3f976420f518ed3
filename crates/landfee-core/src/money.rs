//! # Money Arithmetic
//!
//! Rounding helpers shared by every calculator. All amounts are
//! [`Decimal`]; binary floats never enter a fee computation.
//!
//! "Round to the nearest integer" is half away from zero throughout, which
//! for the non-negative amounts the engine produces is the same as rounding
//! half up.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::TariffError;

/// Number of decimal places in a minor currency unit (kobo, cents, pence).
pub const MINOR_UNIT_PLACES: u32 = 2;

/// Round to the nearest whole currency unit, halves away from zero.
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the nearest minor currency unit, halves away from zero.
pub fn round_minor(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of whole `unit`s needed to cover `quantity`, rounding up.
///
/// A non-positive `unit` covers nothing and yields zero.
pub fn ceil_units(quantity: Decimal, unit: Decimal) -> Result<Decimal, TariffError> {
    if unit <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    quantity
        .checked_div(unit)
        .map(|units| units.ceil())
        .ok_or(TariffError::AmountOutOfRange)
}

/// Round `amount` up to the next multiple of `step`.
///
/// Never rounds down: the result is always `>= amount` for positive steps.
pub fn ceil_to_step(amount: Decimal, step: Decimal) -> Result<Decimal, TariffError> {
    checked_product(ceil_units(amount, step)?, step)
}

/// Apply a fractional rate and round the result to a whole unit.
pub fn rate_of(amount: Decimal, rate: Decimal) -> Result<Decimal, TariffError> {
    checked_product(amount, rate).map(round_whole)
}

/// `a * b`, failing instead of overflowing.
pub fn checked_product(a: Decimal, b: Decimal) -> Result<Decimal, TariffError> {
    a.checked_mul(b).ok_or(TariffError::AmountOutOfRange)
}

/// `a + b`, failing instead of overflowing.
pub fn checked_sum(a: Decimal, b: Decimal) -> Result<Decimal, TariffError> {
    a.checked_add(b).ok_or(TariffError::AmountOutOfRange)
}
