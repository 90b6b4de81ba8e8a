//! Storage errors.

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors returned by [`super::Storage`] implementations.
///
/// Callers may only rely on an error being present; backends are free in
/// how finely they classify failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not created")]
    NotCreated,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unit not found: {id}")]
    NotFound { id: String },

    #[error("list {list} references missing unit {child}")]
    MissingChild { list: String, child: String },

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a missing list child error.
    pub fn missing_child(list: impl Into<String>, child: impl Into<String>) -> Self {
        Self::MissingChild {
            list: list.into(),
            child: child.into(),
        }
    }

    /// Create an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error means the unit does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
