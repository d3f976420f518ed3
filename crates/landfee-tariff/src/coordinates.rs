//! # Coordinates-Picking Fee
//!
//! Fee for picking boundary coordinates on a fresh survey: a fixed share of
//! the base fee, rounded **up** to the next rounding step (10,000 in the
//! built-in schedule). The fee never rounds down or to nearest, so the
//! provider is never underpaid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use landfee_core::money::{ceil_to_step, checked_product};
use landfee_core::TariffError;

/// Coordinates-picking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatesPicking {
    /// Share of the base fee.
    pub rate: Decimal,
    /// Amounts are rounded up to a multiple of this step.
    pub rounding_step: Decimal,
}

impl CoordinatesPicking {
    /// `ceil(base_fee * rate / rounding_step) * rounding_step`.
    pub fn fee(&self, base_fee: Decimal) -> Result<Decimal, TariffError> {
        ceil_to_step(checked_product(base_fee, self.rate)?, self.rounding_step)
    }

    pub(crate) fn validate(&self) -> Result<(), TariffError> {
        if self.rate < Decimal::ZERO {
            return Err(TariffError::InvalidSchedule(
                "coordinates picking rate must not be negative".into(),
            ));
        }
        if self.rounding_step <= Decimal::ZERO {
            return Err(TariffError::InvalidSchedule(
                "coordinates picking rounding step must be positive".into(),
            ));
        }
        Ok(())
    }
}
