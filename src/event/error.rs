//! Event Model Error Types

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EventError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EventError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn is_invalid_config(&self) -> bool {
        matches!(self, EventError::InvalidConfig { .. })
    }
}

/// Result type for event model operations
pub type EventResult<T> = Result<T, EventError>;
