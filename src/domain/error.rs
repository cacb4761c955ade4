//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the path-indexing rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid path, no container separator found: {0}")]
    InvalidPath(String),

    #[error("path conflicts with existing {existing} node '{segment}': {path}")]
    PathConflict {
        path: String,
        segment: String,
        existing: &'static str,
    },

    #[error("no node with id {0}")]
    UnknownNode(usize),

    #[error("node {id} is not a file: {path}")]
    NotAFile { id: usize, path: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
