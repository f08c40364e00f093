//! Stock movement domain model.
//!
//! # Responsibility
//! - Define the immutable movement record appended per registration.
//! - Validate registration requests before any rule is applied.
//!
//! # Invariants
//! - `quantity >= 1`.
//! - `moved_at` is the registration instant, never a caller-supplied value.
//! - Movements are never updated or deleted once recorded.

use crate::model::max_amount;
use crate::model::product::ProductId;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a movement.
pub type MovementId = Uuid;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received; increases stock.
    Incoming,
    /// Goods sold; decreases stock and carries a sale amount.
    Outgoing,
}

impl MovementKind {
    /// Stable lowercase text form used by storage and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl Display for MovementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when movement kind text is not one of the known kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMovementKind(pub String);

impl Display for UnknownMovementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown movement kind `{}`; expected incoming|outgoing",
            self.0
        )
    }
}

impl Error for UnknownMovementKind {}

impl FromStr for MovementKind {
    type Err = UnknownMovementKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            _ => Err(UnknownMovementKind(value.to_string())),
        }
    }
}

/// Validation failures for movement registration requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementValidationError {
    NilProductId,
    ZeroQuantity,
    NegativeSaleAmount(Decimal),
    SaleAmountTooLarge(Decimal),
    MissingSaleAmount,
}

impl Display for MovementValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilProductId => write!(f, "product id must not be nil"),
            Self::ZeroQuantity => write!(f, "movement quantity must be at least 1"),
            Self::NegativeSaleAmount(amount) => {
                write!(f, "sale amount must not be negative, got {amount}")
            }
            Self::SaleAmountTooLarge(amount) => {
                write!(f, "sale amount must not exceed {}, got {amount}", max_amount())
            }
            Self::MissingSaleAmount => write!(f, "outgoing movements require a sale amount"),
        }
    }
}

impl Error for MovementValidationError {}

/// Caller input for a movement registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: u32,
    /// Unit sale amount; required for outgoing, ignored for incoming.
    pub sale_amount: Option<Decimal>,
    /// Accepted for wire compatibility and always discarded.
    #[serde(default)]
    pub requested_at: Option<i64>,
}

impl MovementRequest {
    /// Checks request shape. Stock sufficiency is not checked here.
    pub fn validate(&self) -> Result<(), MovementValidationError> {
        if self.product_id.is_nil() {
            return Err(MovementValidationError::NilProductId);
        }
        if self.quantity == 0 {
            return Err(MovementValidationError::ZeroQuantity);
        }
        match self.sale_amount {
            Some(amount) if amount < Decimal::ZERO => {
                Err(MovementValidationError::NegativeSaleAmount(amount))
            }
            Some(amount) if amount > max_amount() => {
                Err(MovementValidationError::SaleAmountTooLarge(amount))
            }
            None if self.kind == MovementKind::Outgoing => {
                Err(MovementValidationError::MissingSaleAmount)
            }
            _ => Ok(()),
        }
    }
}

/// Immutable record of one applied stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub sale_amount: Option<Decimal>,
    pub quantity: u32,
    /// Registration instant in epoch milliseconds.
    pub moved_at: i64,
}

impl Movement {
    /// Builds the record for a validated request, stamped at `moved_at`.
    ///
    /// `request.requested_at` is dropped on purpose.
    pub fn from_request(request: &MovementRequest, moved_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: request.product_id,
            kind: request.kind,
            sale_amount: request.sale_amount,
            quantity: request.quantity,
            moved_at,
        }
    }

    pub fn is_incoming(&self) -> bool {
        self.kind == MovementKind::Incoming
    }

    pub fn is_outgoing(&self) -> bool {
        self.kind == MovementKind::Outgoing
    }
}

/// Wall-clock readings that cannot be stored as a movement timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    BeforeEpoch,
    OutOfRange,
}

impl Display for ClockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeforeEpoch => write!(f, "system clock is set before the unix epoch"),
            Self::OutOfRange => write!(f, "system clock is beyond the storable range"),
        }
    }
}

impl Error for ClockError {}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> Result<i64, ClockError> {
    epoch_ms_at(SystemTime::now())
}

fn epoch_ms_at(instant: SystemTime) -> Result<i64, ClockError> {
    let elapsed = instant.duration_since(UNIX_EPOCH).map_err(|_| {
        warn!("event=clock_read module=model status=error error_code=clock_before_epoch");
        ClockError::BeforeEpoch
    })?;
    i64::try_from(elapsed.as_millis()).map_err(|_| {
        warn!("event=clock_read module=model status=error error_code=clock_out_of_range");
        ClockError::OutOfRange
    })
}
