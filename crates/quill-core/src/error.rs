//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity_type} not found")]
    NotFound { entity_type: &'static str },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Failures of the strict slug uniqueness check.
#[derive(Debug, Error)]
pub enum SlugError {
    /// The candidate normalized to an empty slug.
    #[error("invalid slug")]
    Invalid,

    #[error("slug already in use")]
    Conflict,

    #[error(transparent)]
    Repo(#[from] RepoError),
}
