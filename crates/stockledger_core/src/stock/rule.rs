use crate::model::product::{Product, ProductId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures raised while applying a mutation rule to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    /// Outgoing quantity exceeds the stock on hand.
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },
    /// Incoming quantity would overflow the stock counter.
    QuantityOverflow {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },
}

impl Display for StockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientStock {
                product_id,
                available,
                requested,
            } => write!(
                f,
                "insufficient stock for product {product_id}: available {available}, requested {requested}"
            ),
            Self::QuantityOverflow {
                product_id,
                available,
                requested,
            } => write!(
                f,
                "stock overflow for product {product_id}: available {available}, incoming {requested}"
            ),
        }
    }
}

impl Error for StockError {}

/// Stock mutation applied by one movement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationRule {
    /// Adds the movement quantity to stock.
    Increase,
    /// Removes the movement quantity from stock; never below zero.
    Decrease,
}

impl MutationRule {
    /// Applies this rule to `product` for `quantity` units.
    ///
    /// On error the product is left exactly as it was.
    pub fn apply(self, product: &mut Product, quantity: u32) -> Result<(), StockError> {
        let available = product.stock_quantity;
        let next = match self {
            Self::Increase => {
                available
                    .checked_add(quantity)
                    .ok_or(StockError::QuantityOverflow {
                        product_id: product.id,
                        available,
                        requested: quantity,
                    })?
            }
            Self::Decrease => {
                available
                    .checked_sub(quantity)
                    .ok_or(StockError::InsufficientStock {
                        product_id: product.id,
                        available,
                        requested: quantity,
                    })?
            }
        };
        product.stock_quantity = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MutationRule, StockError};
    use crate::model::product::{Product, ProductCategory, ProductDraft};
    use rust_decimal::Decimal;

    fn product_with_stock(stock_quantity: u32) -> Product {
        Product::new(ProductDraft {
            code: "P-1".to_string(),
            description: "Chair".to_string(),
            category: ProductCategory::Furniture,
            supplier_cost: Decimal::ONE,
            stock_quantity,
        })
        .unwrap()
    }

    #[test]
    fn increase_adds_quantity() {
        let mut product = product_with_stock(4);
        MutationRule::Increase.apply(&mut product, 6).unwrap();
        assert_eq!(product.stock_quantity, 10);
    }

    #[test]
    fn decrease_to_exactly_zero_is_allowed() {
        let mut product = product_with_stock(5);
        MutationRule::Decrease.apply(&mut product, 5).unwrap();
        assert_eq!(product.stock_quantity, 0);
    }

    #[test]
    fn decrease_below_zero_fails_and_keeps_stock() {
        let mut product = product_with_stock(2);
        let err = MutationRule::Decrease.apply(&mut product, 3).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                product_id: product.id,
                available: 2,
                requested: 3,
            }
        );
        assert_eq!(product.stock_quantity, 2);
    }

    #[test]
    fn increase_overflow_fails_and_keeps_stock() {
        let mut product = product_with_stock(u32::MAX);
        let err = MutationRule::Increase.apply(&mut product, 1).unwrap_err();
        assert!(matches!(err, StockError::QuantityOverflow { .. }));
        assert_eq!(product.stock_quantity, u32::MAX);
    }
}
