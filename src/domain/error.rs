//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree structure or its file format.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid node format at line {line_no}: {line:?}")]
    InvalidFormat { line_no: usize, line: String },

    #[error("unexpected end of input after line {line_no}: question is missing a branch")]
    UnexpectedEnd { line_no: usize },

    #[error("node is not reachable from the root: {0}")]
    Detached(String),

    #[error("failed to read tree: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
