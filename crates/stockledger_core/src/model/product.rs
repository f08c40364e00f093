//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical product record tracked by the stock ledger.
//! - Validate caller-supplied product payloads before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another product.
//! - `supplier_cost` is strictly positive and at most `max_amount()`.
//! - `stock_quantity` is only changed by movement registration.

use crate::model::max_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a product.
pub type ProductId = Uuid;

/// Catalog category of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronic,
    Appliance,
    Furniture,
}

impl ProductCategory {
    /// Stable lowercase text form used by storage and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Electronic => "electronic",
            Self::Appliance => "appliance",
            Self::Furniture => "furniture",
        }
    }
}

impl Display for ProductCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = ProductValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "electronic" => Ok(Self::Electronic),
            "appliance" => Ok(Self::Appliance),
            "furniture" => Ok(Self::Furniture),
            _ => Err(ProductValidationError::UnknownCategory(value.to_string())),
        }
    }
}

/// Validation failures for product payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    NilId,
    BlankCode,
    BlankDescription,
    NonPositiveSupplierCost(Decimal),
    SupplierCostTooLarge(Decimal),
    UnknownCategory(String),
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "product id must not be nil"),
            Self::BlankCode => write!(f, "product code must not be blank"),
            Self::BlankDescription => write!(f, "product description must not be blank"),
            Self::NonPositiveSupplierCost(cost) => {
                write!(f, "supplier cost must be greater than zero, got {cost}")
            }
            Self::SupplierCostTooLarge(cost) => {
                write!(f, "supplier cost must not exceed {}, got {cost}", max_amount())
            }
            Self::UnknownCategory(value) => write!(
                f,
                "unknown product category `{value}`; expected electronic|appliance|furniture"
            ),
        }
    }
}

impl Error for ProductValidationError {}

/// Caller-supplied product fields for create and update flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub code: String,
    pub description: String,
    pub category: ProductCategory,
    /// Batch total when an incoming movement exists, otherwise per-unit cost.
    pub supplier_cost: Decimal,
    /// Initial stock. Ignored on update.
    pub stock_quantity: u32,
}

/// Canonical product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub description: String,
    pub category: ProductCategory,
    pub supplier_cost: Decimal,
    pub stock_quantity: u32,
}

impl Product {
    /// Creates a product from a draft with a freshly generated id.
    pub fn new(draft: ProductDraft) -> Result<Self, ProductValidationError> {
        Self::with_id(Uuid::new_v4(), draft)
    }

    /// Creates a product with a caller-provided stable id.
    pub fn with_id(id: ProductId, draft: ProductDraft) -> Result<Self, ProductValidationError> {
        let product = Self {
            id,
            code: draft.code.trim().to_string(),
            description: draft.description.trim().to_string(),
            category: draft.category,
            supplier_cost: draft.supplier_cost,
            stock_quantity: draft.stock_quantity,
        };
        product.validate()?;
        Ok(product)
    }

    /// Replaces every editable field from `draft`, keeping id and stock.
    pub fn apply_edit(&mut self, draft: ProductDraft) -> Result<(), ProductValidationError> {
        let edited = Self::with_id(
            self.id,
            ProductDraft {
                stock_quantity: self.stock_quantity,
                ..draft
            },
        )?;
        *self = edited;
        Ok(())
    }

    /// Checks product invariants.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.id.is_nil() {
            return Err(ProductValidationError::NilId);
        }
        if self.code.trim().is_empty() {
            return Err(ProductValidationError::BlankCode);
        }
        if self.description.trim().is_empty() {
            return Err(ProductValidationError::BlankDescription);
        }
        if self.supplier_cost <= Decimal::ZERO {
            return Err(ProductValidationError::NonPositiveSupplierCost(
                self.supplier_cost,
            ));
        }
        if self.supplier_cost > max_amount() {
            return Err(ProductValidationError::SupplierCostTooLarge(
                self.supplier_cost,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Product, ProductCategory, ProductDraft, ProductValidationError};
    use crate::model::max_amount;
    use rust_decimal::Decimal;

    fn draft() -> ProductDraft {
        ProductDraft {
            code: " P-001 ".to_string(),
            description: "Desk lamp".to_string(),
            category: ProductCategory::Electronic,
            supplier_cost: Decimal::new(10_000, 2),
            stock_quantity: 3,
        }
    }

    #[test]
    fn new_trims_text_fields() {
        let product = Product::new(draft()).unwrap();
        assert_eq!(product.code, "P-001");
        assert!(!product.id.is_nil());
    }

    #[test]
    fn new_rejects_zero_supplier_cost() {
        let err = Product::new(ProductDraft {
            supplier_cost: Decimal::ZERO,
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ProductValidationError::NonPositiveSupplierCost(Decimal::ZERO)
        );
    }

    #[test]
    fn new_rejects_supplier_cost_above_bound() {
        assert!(Product::new(ProductDraft {
            supplier_cost: max_amount(),
            ..draft()
        })
        .is_ok());

        let err = Product::new(ProductDraft {
            supplier_cost: Decimal::MAX,
            ..draft()
        })
        .unwrap_err();
        assert_eq!(err, ProductValidationError::SupplierCostTooLarge(Decimal::MAX));
    }

    #[test]
    fn apply_edit_keeps_stock_quantity() {
        let mut product = Product::new(draft()).unwrap();
        product
            .apply_edit(ProductDraft {
                description: "Floor lamp".to_string(),
                stock_quantity: 999,
                ..draft()
            })
            .unwrap();
        assert_eq!(product.description, "Floor lamp");
        assert_eq!(product.stock_quantity, 3);
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(
            "FURNITURE".parse::<ProductCategory>().unwrap(),
            ProductCategory::Furniture
        );
        assert!("garden".parse::<ProductCategory>().is_err());
    }
}
