//! Service error taxonomy shared by product and movement use-cases.
//!
//! Every variant carries a stable `error_code()` so transport layers can map
//! it to their own status model without parsing messages.

use crate::model::movement::{ClockError, MovementId, MovementValidationError, UnknownMovementKind};
use crate::model::product::{ProductId, ProductValidationError};
use crate::repo::RepoError;
use crate::service::profit::ProfitError;
use crate::stock::{ResolveError, StockError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from ledger service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Target product does not exist.
    ProductNotFound(ProductId),
    /// Target movement does not exist.
    MovementNotFound(MovementId),
    /// Outgoing quantity exceeds the stock on hand.
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },
    /// Movement kind could not be parsed or resolved to a rule.
    InvalidMovementKind(String),
    /// Request is well formed but forbidden in the current state.
    OperationNotAllowed(String),
    /// Product payload failed validation.
    InvalidProduct(ProductValidationError),
    /// Movement payload failed validation.
    InvalidMovement(MovementValidationError),
    /// Profit figures do not fit the supported amount range.
    AmountOutOfRange(ProfitError),
    /// The system clock cannot produce a movement timestamp.
    Clock(ClockError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Stable machine-readable code for this error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProductNotFound(_) => "product_not_found",
            Self::MovementNotFound(_) => "movement_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::InvalidMovementKind(_) => "invalid_movement_kind",
            Self::OperationNotAllowed(_) => "operation_not_allowed",
            Self::InvalidProduct(_) | Self::InvalidMovement(_) => "validation_failed",
            Self::AmountOutOfRange(_) => "amount_out_of_range",
            Self::Clock(_) => "clock_failure",
            Self::Repo(_) => "storage_failure",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::MovementNotFound(id) => write!(f, "movement not found: {id}"),
            Self::InsufficientStock {
                product_id,
                available,
                requested,
            } => write!(
                f,
                "insufficient stock for product {product_id}: available {available}, requested {requested}"
            ),
            Self::InvalidMovementKind(kind) => write!(f, "invalid movement kind: {kind}"),
            Self::OperationNotAllowed(reason) => write!(f, "operation not allowed: {reason}"),
            Self::InvalidProduct(err) => write!(f, "invalid product: {err}"),
            Self::InvalidMovement(err) => write!(f, "invalid movement: {err}"),
            Self::AmountOutOfRange(err) => write!(f, "{err}"),
            Self::Clock(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidProduct(err) => Some(err),
            Self::InvalidMovement(err) => Some(err),
            Self::AmountOutOfRange(err) => Some(err),
            Self::Clock(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(product_id) => Self::ProductNotFound(product_id),
            RepoError::Validation(err) => Self::InvalidProduct(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ProductValidationError> for ServiceError {
    fn from(value: ProductValidationError) -> Self {
        Self::InvalidProduct(value)
    }
}

impl From<MovementValidationError> for ServiceError {
    fn from(value: MovementValidationError) -> Self {
        Self::InvalidMovement(value)
    }
}

impl From<ProfitError> for ServiceError {
    fn from(value: ProfitError) -> Self {
        Self::AmountOutOfRange(value)
    }
}

impl From<ClockError> for ServiceError {
    fn from(value: ClockError) -> Self {
        Self::Clock(value)
    }
}

impl From<UnknownMovementKind> for ServiceError {
    fn from(value: UnknownMovementKind) -> Self {
        Self::InvalidMovementKind(value.0)
    }
}

// Unsupported and unknown kinds are indistinguishable to callers.
impl From<ResolveError> for ServiceError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::UnsupportedMovementKind(kind) => {
                Self::InvalidMovementKind(kind.as_str().to_string())
            }
        }
    }
}

impl From<StockError> for ServiceError {
    fn from(value: StockError) -> Self {
        match value {
            StockError::InsufficientStock {
                product_id,
                available,
                requested,
            } => Self::InsufficientStock {
                product_id,
                available,
                requested,
            },
            overflow @ StockError::QuantityOverflow { .. } => {
                Self::OperationNotAllowed(overflow.to_string())
            }
        }
    }
}
