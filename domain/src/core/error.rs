//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every variant describes a broken structural invariant. Agent and provider
/// failures are never represented here; they are absorbed into
/// [`AgentResult`](crate::orchestration::result::AgentResult) values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Execution plan has no stages")]
    EmptyPlan,

    #[error("Stage {0} has no agents")]
    EmptyStage(usize),

    #[error("Stage index {found} is out of order (expected {expected})")]
    StageOutOfOrder { expected: usize, found: usize },

    #[error("Agent '{0}' appears more than once in the plan")]
    DuplicateAgent(String),

    #[error("Usage for agent '{0}' was already recorded")]
    DuplicateUsage(String),

    #[error("Illegal plan state transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Unknown agent role: {0}")]
    UnknownRole(String),

    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    #[error("Unknown retrieval mode: {0}")]
    UnknownRetrievalMode(String),
}
