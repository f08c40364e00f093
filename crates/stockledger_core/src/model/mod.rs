//! Domain model for products and their stock movements.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input validation for product and movement payloads.
//!
//! # Invariants
//! - Every product and movement is identified by a stable UUID.
//! - Product stock quantity is never negative (`u32`).
//! - A movement quantity is always >= 1.
//! - Money amounts stay at or below `max_amount()`.

use rust_decimal::Decimal;

pub mod movement;
pub mod product;

const MAX_AMOUNT_UNITS: u64 = 1_000_000_000_000;

/// Largest accepted supplier cost or sale amount.
///
/// Keeps `amount * u32::MAX` and sums over long histories inside the
/// `Decimal` range.
pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}
