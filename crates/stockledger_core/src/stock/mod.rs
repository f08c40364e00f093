//! Stock mutation rules and their kind-to-rule resolution.
//!
//! # Responsibility
//! - Model the closed set of stock mutations (increase/decrease).
//! - Resolve a movement kind to its rule through an injected table.
//!
//! # Invariants
//! - A failed rule application leaves the product untouched.
//! - Product stock never goes below zero.

mod resolver;
mod rule;

pub use resolver::{ResolveError, RuleTable};
pub use rule::{MutationRule, StockError};
