//! Error types for the endpoint.

use behat_storage::StorageError;
use thiserror::Error;

/// Result type for endpoint operations.
pub type EndpointResult<T> = Result<T, EndpointError>;

#[derive(Debug, Error)]
pub enum EndpointError {
    /// No handler is registered for the operation name.
    #[error("operation '{0}' unknown")]
    UnknownOperation(String),

    /// The payload is not JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// The payload is JSON but not the shape the operation needs.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
