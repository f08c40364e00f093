//! Stock movement use-case service.
//!
//! # Responsibility
//! - Register incoming/outgoing movements against a product's stock.
//! - Serve movement lookups and product-scoped history.
//!
//! # Invariants
//! - Registration performs zero writes on any failure.
//! - On success exactly one product stock update and one movement insert
//!   happen, through a single `record_movement` call.
//! - The stored timestamp is the registration instant.

use crate::model::movement::{now_epoch_ms, Movement, MovementId, MovementRequest};
use crate::model::product::ProductId;
use crate::repo::movement_repo::MovementRepository;
use crate::repo::product_repo::ProductRepository;
use crate::service::error::ServiceError;
use crate::stock::RuleTable;
use log::{info, warn};

/// Use-case service for stock movements.
pub struct MovementService<P: ProductRepository, M: MovementRepository> {
    products: P,
    movements: M,
    rules: RuleTable,
}

impl<P: ProductRepository, M: MovementRepository> MovementService<P, M> {
    /// Creates a service with the standard incoming/outgoing rules.
    pub fn new(products: P, movements: M) -> Self {
        Self::with_rules(products, movements, RuleTable::STANDARD)
    }

    /// Creates a service with an explicit kind-to-rule table.
    pub fn with_rules(products: P, movements: M, rules: RuleTable) -> Self {
        Self {
            products,
            movements,
            rules,
        }
    }

    /// Applies one movement to its product and records it.
    ///
    /// # Errors
    /// - `InvalidMovement` when the request shape is invalid.
    /// - `ProductNotFound` when the product does not exist.
    /// - `InvalidMovementKind` when no rule resolves for the kind.
    /// - `InsufficientStock` when an outgoing quantity exceeds stock.
    pub fn register_movement(&self, request: &MovementRequest) -> Result<Movement, ServiceError> {
        request.validate()?;

        let mut product = self
            .products
            .get_product(request.product_id)?
            .ok_or(ServiceError::ProductNotFound(request.product_id))?;

        let rule = self.rules.resolve(request.kind).map_err(|err| {
            warn!(
                "event=movement_register module=service status=error error_code=invalid_movement_kind product_id={} kind={}",
                request.product_id, request.kind
            );
            ServiceError::from(err)
        })?;

        if let Err(err) = rule.apply(&mut product, request.quantity) {
            warn!(
                "event=movement_register module=service status=error error_code=stock_rule_rejected product_id={} kind={} quantity={} error={}",
                request.product_id, request.kind, request.quantity, err
            );
            return Err(err.into());
        }

        let moved_at = now_epoch_ms().map_err(|err| {
            warn!(
                "event=movement_register module=service status=error error_code=clock_failure product_id={} error={}",
                request.product_id, err
            );
            ServiceError::from(err)
        })?;
        let movement = Movement::from_request(request, moved_at);
        self.movements.record_movement(&product, &movement)?;

        info!(
            "event=movement_register module=service status=ok product_id={} movement_id={} kind={} quantity={} stock_after={}",
            product.id, movement.id, movement.kind, movement.quantity, product.stock_quantity
        );
        Ok(movement)
    }

    /// Gets one movement by id.
    pub fn get_movement(&self, id: MovementId) -> Result<Movement, ServiceError> {
        self.movements
            .get_movement(id)?
            .ok_or(ServiceError::MovementNotFound(id))
    }

    /// Lists every recorded movement in registration order.
    pub fn list_movements(&self) -> Result<Vec<Movement>, ServiceError> {
        Ok(self.movements.list_movements()?)
    }

    /// Lists one product's movements in registration order.
    pub fn list_movements_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Movement>, ServiceError> {
        if !self.products.product_exists(product_id)? {
            return Err(ServiceError::ProductNotFound(product_id));
        }
        Ok(self.movements.list_movements_for_product(product_id)?)
    }
}
