//! Error types for the site services.

use thiserror::Error;

/// Result type for site service operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in site service operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error (state file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The site defines no such entity type.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Entity fields rejected by the store.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A writer panicked while holding the site lock.
    #[error("site state lock poisoned")]
    Poisoned,
}
