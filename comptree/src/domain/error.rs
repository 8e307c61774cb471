//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree store's contract.
/// Both are raised before any new store value is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
