//! Product use-case service.
//!
//! # Responsibility
//! - Provide product create/get/list/update/delete entry points.
//! - Serve the profit query for a product.
//!
//! # Invariants
//! - Editing a product never changes its stock quantity.
//! - A product with recorded movements cannot be deleted.

use crate::model::product::{Product, ProductCategory, ProductDraft, ProductId};
use crate::repo::movement_repo::MovementRepository;
use crate::repo::product_repo::{ProductListQuery, ProductRepository};
use crate::service::error::ServiceError;
use crate::service::profit::{derive_profit, ProfitReport};
use log::{info, warn};

/// Use-case service for products and their profitability.
pub struct ProductService<P: ProductRepository, M: MovementRepository> {
    products: P,
    movements: M,
}

impl<P: ProductRepository, M: MovementRepository> ProductService<P, M> {
    pub fn new(products: P, movements: M) -> Self {
        Self {
            products,
            movements,
        }
    }

    /// Creates a product with a generated id and returns it.
    pub fn create_product(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        let product = Product::new(draft)?;
        self.products.create_product(&product)?;
        info!(
            "event=product_create module=service status=ok product_id={} category={}",
            product.id, product.category
        );
        Ok(product)
    }

    pub fn get_product(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.products
            .get_product(id)?
            .ok_or(ServiceError::ProductNotFound(id))
    }

    pub fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.list_products(&ProductListQuery::default())?)
    }

    pub fn list_products_by_category(
        &self,
        category: ProductCategory,
    ) -> Result<Vec<Product>, ServiceError> {
        let query = ProductListQuery {
            category: Some(category),
        };
        Ok(self.products.list_products(&query)?)
    }

    /// Replaces editable fields of an existing product.
    ///
    /// `draft.stock_quantity` is ignored.
    pub fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, ServiceError> {
        let mut product = self.get_product(id)?;
        product.apply_edit(draft)?;
        self.products.update_product(&product)?;
        info!(
            "event=product_update module=service status=ok product_id={}",
            product.id
        );
        Ok(product)
    }

    /// Deletes a product that has no movement history.
    pub fn delete_product(&self, id: ProductId) -> Result<(), ServiceError> {
        if !self.products.product_exists(id)? {
            return Err(ServiceError::ProductNotFound(id));
        }

        if self.movements.has_movements_for_product(id)? {
            let count = self.movements.count_movements_for_product(id)?;
            warn!(
                "event=product_delete module=service status=error error_code=operation_not_allowed product_id={} movement_count={}",
                id, count
            );
            return Err(ServiceError::OperationNotAllowed(format!(
                "product {id} has {count} recorded movement(s) and cannot be deleted"
            )));
        }

        self.products.delete_product(id)?;
        info!(
            "event=product_delete module=service status=ok product_id={}",
            id
        );
        Ok(())
    }

    /// Loads a product and its history and derives its profitability.
    pub fn profit_report(&self, id: ProductId) -> Result<ProfitReport, ServiceError> {
        let product = self.get_product(id)?;
        let movements = self.movements.list_movements_for_product(id)?;
        derive_profit(&product, &movements).map_err(|err| {
            warn!(
                "event=profit_report module=service status=error error_code=amount_out_of_range product_id={} movement_count={}",
                id,
                movements.len()
            );
            ServiceError::from(err)
        })
    }
}
