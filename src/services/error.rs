use crate::{
    domain::errors::{InvariantViolation, StorageError},
    services::validation::ValidationErrors,
};

/// Failures an item operation can end with.
///
/// Not-found is deliberately absent: it is an ordinary outcome, reported as
/// `None` or `false` by the operations that can produce it.
#[derive(Debug, thiserror::Error)]
pub enum ItemServiceError {
    #[error("{0}")]
    ValidationFailed(ValidationErrors),

    #[error("Invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolation),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ItemServiceError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ItemServiceError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for item operations
pub type ItemServiceResult<T> = Result<T, ItemServiceError>;
