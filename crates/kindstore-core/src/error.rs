//! Error types for datastore operations.

use thiserror::Error;

/// Errors that can occur while mapping records to and from the store.
#[derive(Debug, Error)]
pub enum Error {
    /// Record has neither a resolved key nor a derivable complete key.
    #[error("Unresolvable key: {0}")]
    UnresolvableKey(String),

    /// Key metadata could not be derived, e.g. missing kind.
    #[error("Invalid key metadata: {0}")]
    InvalidMetadata(String),

    /// Stored value does not match the destination record type.
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    /// No entry exists under the key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cursor token could not be decoded.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Record could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Pass-through error from the underlying store.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for datastore operations.
pub type Result<T> = std::result::Result<T, Error>;
