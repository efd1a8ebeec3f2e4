use crate::domain::value_objects::ItemId;

/// Errors raised by a storage backend
#[derive(Debug, Clone)]
pub enum StorageError {
    /// A write targeted a row that does not exist
    ItemNotFound { id: ItemId },

    /// An insert collided with an existing row
    ItemAlreadyExists { id: ItemId },

    /// A stored row could not be turned back into a valid item
    CorruptRecord { id: ItemId, reason: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },

    /// Commit could not be applied
    CommitFailed { message: String },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ItemNotFound { id } => write!(f, "Item not found: {}", id),
            StorageError::ItemAlreadyExists { id } => write!(f, "Item already exists: {}", id),
            StorageError::CorruptRecord { id, reason } => {
                write!(f, "Stored item {} is invalid: {}", id, reason)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
            StorageError::CommitFailed { message } => write!(f, "Commit failed: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
