//! # landfee-core — Foundational Types for the Tariff Engine
//!
//! This crate defines the types every fee calculator produces and consumes.
//! It depends on nothing internal; `landfee-tariff` and `landfee-cli` build
//! on it.
//!
//! ## Key Design Principles
//!
//! 1. **Decimal money.** Amounts, rates and plot sizes are
//!    `rust_decimal::Decimal`. No `f64` enters a fee computation, and
//!    canonical quote bytes reject floats outright.
//!
//! 2. **One breakdown builder.** Every calculator assembles its result
//!    through [`BreakdownBuilder`], so `total == subtotal + tax` and the
//!    subtotal reconciliation hold by construction.
//!
//! 3. **Hidden charges are still recorded.** Charges that are part of the
//!    subtotal without a customer-facing line are kept as
//!    [`Adjustment`]s, so every breakdown can be audited.
//!
//! 4. **Single error taxonomy.** [`TariffError`] covers request, table and
//!    availability failures, with a [`ErrorDisposition`] for presentation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `landfee-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod billing;
pub mod canonical;
pub mod currency;
pub mod error;
pub mod money;
pub mod zone;

// Re-export primary types for ergonomic imports.
pub use billing::{
    Adjustment, AdjustmentKind, BillingBreakdown, BillingItem, BreakdownBuilder, LineKind,
};
pub use canonical::{quote_digest, CanonicalBytes, QuoteDigest};
pub use currency::{format_currency, Currency};
pub use error::{CanonicalizationError, ErrorDisposition, TariffError};
pub use zone::ZoneKey;

pub use rust_decimal::Decimal;
