use thiserror::Error;
use uuid::Uuid;

/// Failure reported by any repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// A stored row could not be turned back into a domain value.
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Duplicate error: {0}")]
    DuplicateError(String),
}
