//! Profit derivation over a product's movement history.
//!
//! # Invariants
//! - Derivation is pure: no repository access, no side effects.
//! - Unit cost and average sale price are rounded half-up to 2 places.
//! - Unit profit is floored at zero; total profit is never floored.
//! - Total profit sums per-movement margins using each movement's own
//!   sale amount, so it can differ from `unit_profit * outgoing_quantity`.

use crate::model::movement::Movement;
use crate::model::product::{Product, ProductId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MONEY_SCALE: u32 = 2;

/// Profitability figures for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitReport {
    pub product_id: ProductId,
    pub description: String,
    /// Sum of quantities over outgoing movements.
    pub outgoing_quantity: u64,
    pub unit_cost: Decimal,
    pub average_sale_price: Decimal,
    /// `average_sale_price - unit_cost`, never below zero.
    pub unit_profit: Decimal,
    /// Sum of `(sale_amount - unit_cost) * quantity`; may be negative.
    pub total_profit: Decimal,
}

/// Raised when a product's history produces figures outside the `Decimal`
/// range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfitError {
    AmountOverflow { product_id: ProductId },
}

impl Display for ProfitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmountOverflow { product_id } => write!(
                f,
                "profit figures for product {product_id} exceed the supported amount range"
            ),
        }
    }
}

impl Error for ProfitError {}

/// Derives profitability for `product` from its complete movement history.
///
/// `movements` must belong to `product` and be in registration order; the
/// first incoming movement decides how `supplier_cost` is interpreted.
/// Outgoing movements without a sale amount count as sold at zero.
pub fn derive_profit(
    product: &Product,
    movements: &[Movement],
) -> Result<ProfitReport, ProfitError> {
    let overflow = || ProfitError::AmountOverflow {
        product_id: product.id,
    };
    let unit_cost = unit_cost(product, movements);

    let mut outgoing_quantity: u64 = 0;
    let mut sales_total = Decimal::ZERO;
    let mut total_profit = Decimal::ZERO;
    for movement in movements.iter().filter(|movement| movement.is_outgoing()) {
        let quantity = Decimal::from(movement.quantity);
        let sale_amount = movement.sale_amount.unwrap_or(Decimal::ZERO);
        let margin = sale_amount
            .checked_sub(unit_cost)
            .and_then(|margin| margin.checked_mul(quantity))
            .ok_or_else(overflow)?;

        outgoing_quantity = outgoing_quantity
            .checked_add(u64::from(movement.quantity))
            .ok_or_else(overflow)?;
        sales_total = sale_amount
            .checked_mul(quantity)
            .and_then(|sales| sales_total.checked_add(sales))
            .ok_or_else(overflow)?;
        total_profit = total_profit.checked_add(margin).ok_or_else(overflow)?;
    }

    let average_sale_price = if outgoing_quantity == 0 {
        Decimal::ZERO
    } else {
        round_money(sales_total / Decimal::from(outgoing_quantity))
    };
    let unit_profit = average_sale_price
        .checked_sub(unit_cost)
        .ok_or_else(overflow)?
        .max(Decimal::ZERO);

    Ok(ProfitReport {
        product_id: product.id,
        description: product.description.clone(),
        outgoing_quantity,
        unit_cost,
        average_sale_price,
        unit_profit,
        total_profit,
    })
}

/// Per-unit purchase cost.
///
/// With an incoming movement, `supplier_cost` is read as the batch total of
/// the first one and split over its quantity. Without one, it is already a
/// per-unit value and returned unchanged.
pub fn unit_cost(product: &Product, movements: &[Movement]) -> Decimal {
    match movements.iter().find(|movement| movement.is_incoming()) {
        Some(first_incoming) => {
            round_money(product.supplier_cost / Decimal::from(first_incoming.quantity))
        }
        None => product.supplier_cost,
    }
}

// Always carries exactly two decimal places, so `10` renders as `10.00`.
fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use super::{derive_profit, round_money, unit_cost, ProfitError};
    use crate::model::movement::{Movement, MovementKind};
    use crate::model::product::{Product, ProductCategory, ProductDraft};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn product(supplier_cost: Decimal) -> Product {
        Product::new(ProductDraft {
            code: "TV-55".to_string(),
            description: "55 inch TV".to_string(),
            category: ProductCategory::Electronic,
            supplier_cost,
            stock_quantity: 0,
        })
        .unwrap()
    }

    fn movement(
        product: &Product,
        kind: MovementKind,
        quantity: u32,
        sale_amount: Option<Decimal>,
        moved_at: i64,
    ) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            product_id: product.id,
            kind,
            sale_amount,
            quantity,
            moved_at,
        }
    }

    fn money(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_money(money("2.345")), money("2.35"));
        assert_eq!(round_money(money("2.344")), money("2.34"));
        assert_eq!(round_money(money("-2.345")), money("-2.35"));
    }

    #[test]
    fn rounded_money_keeps_two_places() {
        assert_eq!(round_money(money("10")).to_string(), "10.00");
    }

    #[test]
    fn unit_cost_uses_first_incoming_only() {
        let product = product(money("90.00"));
        let movements = vec![
            movement(&product, MovementKind::Outgoing, 1, Some(money("5")), 1),
            movement(&product, MovementKind::Incoming, 9, None, 2),
            movement(&product, MovementKind::Incoming, 3, None, 3),
        ];
        assert_eq!(unit_cost(&product, &movements), money("10.00"));
    }

    #[test]
    fn unit_cost_rounds_repeating_division() {
        let product = product(money("100.00"));
        let movements = vec![movement(&product, MovementKind::Incoming, 3, None, 1)];
        assert_eq!(unit_cost(&product, &movements), money("33.33"));
    }

    #[test]
    fn empty_history_reports_zero_figures() {
        let product = product(money("100.00"));
        let report = derive_profit(&product, &[]).unwrap();
        assert_eq!(report.outgoing_quantity, 0);
        assert_eq!(report.unit_cost, money("100.00"));
        assert_eq!(report.average_sale_price, Decimal::ZERO);
        assert_eq!(report.unit_profit, Decimal::ZERO);
        assert_eq!(report.total_profit, Decimal::ZERO);
    }

    #[test]
    fn total_profit_is_not_floored_per_movement() {
        let product = product(money("100.00"));
        let movements = vec![
            movement(&product, MovementKind::Incoming, 10, None, 1),
            movement(&product, MovementKind::Outgoing, 2, Some(money("7.00")), 2),
        ];
        let report = derive_profit(&product, &movements).unwrap();
        assert_eq!(report.unit_cost, money("10.00"));
        assert_eq!(report.unit_profit, Decimal::ZERO);
        assert_eq!(report.total_profit, money("-6.00"));
    }

    #[test]
    fn overflowing_history_is_an_error_not_a_panic() {
        let product = product(money("100.00"));
        let movements = vec![movement(
            &product,
            MovementKind::Outgoing,
            2,
            Some(Decimal::MAX),
            1,
        )];
        assert_eq!(
            derive_profit(&product, &movements),
            Err(ProfitError::AmountOverflow {
                product_id: product.id
            })
        );
    }
}
