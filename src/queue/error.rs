//! Queue Error Types

use crate::event::EventError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// A required dependency or setting was missing at construction time
    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },

    /// Caller misuse of an otherwise healthy service
    #[error("Invalid execution: {message}")]
    InvalidExecution { message: String },

    /// Nothing is queued or resolvable where the caller looked
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Opaque failure from the storage backend
    #[error(transparent)]
    Storage(StorageError),

    /// Event (de)serialization or validation failure
    #[error(transparent)]
    Event(#[from] EventError),
}

impl QueueError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        QueueError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_execution(message: impl Into<String>) -> Self {
        QueueError::InvalidExecution {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        QueueError::NotFound {
            message: message.into(),
        }
    }

    pub fn is_invalid_config(&self) -> bool {
        matches!(self, QueueError::InvalidConfig { .. })
    }

    pub fn is_invalid_execution(&self) -> bool {
        matches!(self, QueueError::InvalidExecution { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QueueError::NotFound { .. })
    }
}

// A missing key at the backend is the queue-level "nothing here"; every
// other backend failure stays opaque.
impl From<StorageError> for QueueError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key } => QueueError::NotFound {
                message: format!("no value under key {}", key),
            },
            other => QueueError::Storage(other),
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
