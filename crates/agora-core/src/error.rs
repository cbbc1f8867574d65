//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures detected before touching a store.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),
}

/// Repository-level errors.
///
/// Every post operation surfaces these unchanged; the engine itself never fails.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Stored document could not be decoded: {0}")]
    Serialization(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Operation not permitted for this user")]
    Forbidden,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
