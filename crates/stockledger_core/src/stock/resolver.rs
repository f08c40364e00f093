use super::rule::MutationRule;
use crate::model::movement::MovementKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raised when a rule table has no entry for a movement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    UnsupportedMovementKind(MovementKind),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedMovementKind(kind) => {
                write!(f, "unsupported movement kind: {kind}")
            }
        }
    }
}

impl Error for ResolveError {}

/// Constant mapping from movement kind to mutation rule.
///
/// Passed to the movement service at construction; there is no global
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTable {
    entries: &'static [(MovementKind, MutationRule)],
}

impl RuleTable {
    /// Incoming increases stock, outgoing decreases it.
    pub const STANDARD: RuleTable = RuleTable::new(&[
        (MovementKind::Incoming, MutationRule::Increase),
        (MovementKind::Outgoing, MutationRule::Decrease),
    ]);

    pub const fn new(entries: &'static [(MovementKind, MutationRule)]) -> Self {
        Self { entries }
    }

    /// Returns the rule registered for `kind`.
    ///
    /// Unknown kinds are rejected instead of resolving to a no-op.
    pub fn resolve(&self, kind: MovementKind) -> Result<MutationRule, ResolveError> {
        self.entries
            .iter()
            .find(|(entry_kind, _)| *entry_kind == kind)
            .map(|(_, rule)| *rule)
            .ok_or(ResolveError::UnsupportedMovementKind(kind))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
