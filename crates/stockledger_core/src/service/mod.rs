//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into ledger use-cases.
//! - Host the stock mutation flow and the profit derivation.
//! - Translate lower-layer failures into one error taxonomy.

pub mod error;
pub mod movement_service;
pub mod product_service;
pub mod profit;
