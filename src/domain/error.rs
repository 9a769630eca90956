//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent violations of the tree's structural invariants.
/// Navigation never produces one; only construction does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found in arena: {0:?}")]
    NodeNotFound(Index),

    #[error("tree has no root node")]
    EmptyTree,

    #[error("pop without an open node at event {event}")]
    PopAboveRoot { event: usize },

    #[error("second root node '{value}' at event {event}")]
    MultipleRoots { event: usize, value: String },

    #[error("structural mismatch: {open} node(s) still open after last event")]
    StructuralMismatch { open: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
