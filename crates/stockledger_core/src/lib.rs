//! Core domain logic for the stock ledger.
//! Stock mutation rules and profit derivation live here; storage is SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stock;

pub use logging::{default_log_level, init_logging, LogLevel};
pub use model::max_amount;
pub use model::movement::{
    ClockError, Movement, MovementId, MovementKind, MovementRequest, MovementValidationError,
    UnknownMovementKind,
};
pub use model::product::{
    Product, ProductCategory, ProductDraft, ProductId, ProductValidationError,
};
pub use repo::movement_repo::{MovementRepository, SqliteMovementRepository};
pub use repo::product_repo::{ProductListQuery, ProductRepository, SqliteProductRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error::ServiceError;
pub use service::movement_service::MovementService;
pub use service::product_service::ProductService;
pub use service::profit::{derive_profit, ProfitError, ProfitReport};
pub use stock::{MutationRule, ResolveError, RuleTable, StockError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
